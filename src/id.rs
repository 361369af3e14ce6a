/// Identity of the rendered text element. A new key tells the renderer to
/// drop the old element instead of patching it.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ElementKey(u64);

impl ElementKey {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

#[track_caller]
pub fn stable_auto_id(prefix: &str) -> String {
    let location = std::panic::Location::caller();
    let seed = format!(
        "{prefix}:{}:{}:{}",
        location.file(),
        location.line(),
        location.column()
    );
    format!("{prefix}-{:016x}", fnv1a64(seed.as_bytes()))
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x00000100000001b3;

    let mut hash = OFFSET_BASIS;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}
