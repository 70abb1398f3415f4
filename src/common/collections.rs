pub type HashSet<T> = rustc_hash::FxHashSet<T>;
