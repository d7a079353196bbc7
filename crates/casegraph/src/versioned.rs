// -------------------------------------------------------------------
// Versioned
// -------------------------------------------------------------------

/// A value with a counter bumped on every write, so derived views can tell
/// when to recompute.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    version: u64,
    data: T,
}

impl<T> Versioned<T> {
    pub fn new(data: T) -> Self {
        Self { version: 0, data }
    }

    pub fn get(&self) -> &T {
        &self.data
    }

    pub fn set(&mut self, data: T) {
        self.data = data;
        self.version = self.version.wrapping_add(1);
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}

// -------------------------------------------------------------------
// Memoized
// -------------------------------------------------------------------

/// A derived value recomputed only when its key changes.
pub struct Memoized<S, K, V> {
    recomputations: u64,
    slot: Option<(K, V)>,
    get_key: Box<dyn Fn(&S) -> K>,
    calc: Box<dyn Fn(&S) -> V>,
}

impl<S, K, V> Memoized<S, K, V>
where
    K: PartialEq,
{
    pub fn new(
        get_key: impl Fn(&S) -> K + 'static,
        calc: impl Fn(&S) -> V + 'static,
    ) -> Self {
        Self {
            recomputations: 0,
            slot: None,
            get_key: Box::new(get_key),
            calc: Box::new(calc),
        }
    }

    pub fn get(&mut self, source: &S) -> &V {
        let key = (self.get_key)(source);
        let entry = match self.slot.take() {
            Some((cached, value)) if cached == key => (cached, value),
            _ => {
                self.recomputations = self.recomputations.wrapping_add(1);
                (key, (self.calc)(source))
            }
        };
        &self.slot.insert(entry).1
    }

    /// Number of times the value has been computed.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}
