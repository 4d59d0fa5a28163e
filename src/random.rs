//! 波動関数の収縮に使う乱数源。
//!
//! 乱数はプロセス全体で 1 つの乱数源から引く。乱数源は呼び出し側が作って引数で渡すこと。
//! テストでは `FixedRandom` や `SequenceRandom` を渡せば結果が決定的になる。

use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng as _};

/// `[0, 1)` の一様乱数を返す乱数源。
pub trait RandomSource {
    /// 次の乱数を返す。値は `[0, 1)` に収まらなければならない。
    fn next_unit(&mut self) -> f64;
}

/// 本番用の乱数源。
#[derive(Clone, Debug)]
pub struct StdRandom(StdRng);

impl StdRandom {
    /// シードを指定して乱数源を作る。
    pub fn from_seed(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    /// OS のエントロピーから乱数源を作る。
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl RandomSource for StdRandom {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }
}

/// 常に同じ値を返す乱数源(テスト用)。
#[derive(Clone, Copy, Debug)]
pub struct FixedRandom(f64);

impl FixedRandom {
    pub fn new(value: f64) -> Self {
        debug_assert!((0.0..1.0).contains(&value));

        Self(value)
    }
}

impl RandomSource for FixedRandom {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

/// 与えられた値を順に返す乱数源(テスト用)。末尾まで使い切ったら先頭に戻る。
#[derive(Clone, Debug)]
pub struct SequenceRandom {
    values: Vec<f64>,
    next: usize,
}

impl SequenceRandom {
    /// `values` は空であってはならない。
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values = values.into();
        debug_assert!(!values.is_empty());
        debug_assert!(values.iter().all(|v| (0.0..1.0).contains(v)));

        Self { values, next: 0 }
    }

    /// これまでに引かれた乱数の個数を返す。
    pub fn draws(&self) -> usize {
        self.next
    }
}

impl RandomSource for SequenceRandom {
    fn next_unit(&mut self) -> f64 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;

        value
    }
}
