//! 可插拔的随机源。
//!
//! 洗牌和发牌只依赖 [`RandomSource`]：正常游戏用平台随机数，
//! 会话的第一手牌则用 [`SeededRandom`]，保证同一个标识符总是拿到同一手牌。

use rand::Rng;
use rand::rngs::ThreadRng;

/// Park–Miller 最小标准生成器的模数 (2^31 - 1)
const PARK_MILLER_MODULUS: u64 = 2_147_483_647;
const PARK_MILLER_MULTIPLIER: u64 = 16_807;

/// 均匀分布在 `[0, 1)` 的浮点数来源
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;
}

/// 任何 `FnMut() -> f64` 闭包都可以直接当随机源使用
impl<F: FnMut() -> f64> RandomSource for F {
    fn next_f64(&mut self) -> f64 {
        self()
    }
}

/// 把字符串标识符折叠成一个正的 32 位种子
///
/// 按 UTF-16 码元计算 `seed = seed * 31 + unit (mod 2^32)`，结果为 0 时取 1。
pub fn seed_from_identifier(text: &str) -> u32 {
    let seed = text
        .encode_utf16()
        .fold(0u32, |seed, unit| seed.wrapping_mul(31).wrapping_add(u32::from(unit)));
    if seed == 0 { 1 } else { seed }
}

/// 基于 Park–Miller 参数的线性同余生成器，序列完全由初始种子决定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    pub fn new(seed: u32) -> Self {
        let mut state = u64::from(seed) % PARK_MILLER_MODULUS;
        if state == 0 {
            state += PARK_MILLER_MODULUS - 1;
        }
        SeededRandom { state }
    }

    /// 直接从标识符构造
    pub fn from_identifier(text: &str) -> Self {
        Self::new(seed_from_identifier(text))
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.state = self.state * PARK_MILLER_MULTIPLIER % PARK_MILLER_MODULUS;
        (self.state - 1) as f64 / (PARK_MILLER_MODULUS - 1) as f64
    }
}

/// 包装任意 `rand::Rng` 的随机源，默认使用线程本地随机数
#[derive(Debug, Clone)]
pub struct PlatformRandom<R = ThreadRng>(R);

impl<R: Rng> PlatformRandom<R> {
    pub fn new(rng: R) -> Self {
        PlatformRandom(rng)
    }
}

impl Default for PlatformRandom<ThreadRng> {
    fn default() -> Self {
        PlatformRandom(rand::rng())
    }
}

impl<R: Rng> RandomSource for PlatformRandom<R> {
    fn next_f64(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}
