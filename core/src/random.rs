pub const SCATTER_X_SALT: u32 = 0x5CA7_7E12;
pub const SCATTER_Y_SALT: u32 = 0xB16B_00B5;
pub const EVADE_X_SALT: u32 = 0x0DD_BA11;
pub const EVADE_Y_SALT: u32 = 0x7E57_AB1E;

pub fn splitmix32(mut value: u32) -> u32 {
    value = value.wrapping_add(0x9E37_79B9);
    let mut z = value;
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

/// Uniform in [0, 1).
pub fn rand_unit(seed: u32, salt: u32) -> f32 {
    let mixed = splitmix32(seed ^ salt);
    let top = mixed >> 8;
    top as f32 / ((1u32 << 24) as f32)
}

pub fn rand_range(seed: u32, salt: u32, min: f32, max: f32) -> f32 {
    min + (max - min) * rand_unit(seed, salt)
}

/// Per-item seed so neighbors in a batch don't share a stream.
pub fn item_seed(seed: u32, index: usize) -> u32 {
    splitmix32(seed.wrapping_add((index as u32).wrapping_mul(0x2545_F491)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_stays_in_range() {
        for seed in 0..512u32 {
            let value = rand_unit(seed, SCATTER_X_SALT);
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn item_seeds_differ() {
        assert_ne!(item_seed(7, 0), item_seed(7, 1));
        assert_eq!(item_seed(7, 3), item_seed(7, 3));
    }
}
