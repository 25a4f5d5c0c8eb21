//! Single-pass summary statistics over a numeric projection.

use std::fmt;

/// Numeric types a pipeline can summarize.
///
/// The running sum is kept in a wider [`StatValue::Sum`] type so that
/// summing in-range values cannot overflow the element type.
pub trait StatValue: Copy + PartialOrd + Send + 'static {
    type Sum: StatSum;

    fn widen(self) -> Self::Sum;
}

/// Accumulator for the running sum of a [`StatValue`].
pub trait StatSum: Copy + PartialEq + fmt::Debug + fmt::Display + Send + 'static {
    fn zero() -> Self;
    fn plus(self, other: Self) -> Self;
    fn to_f64(self) -> f64;
}

macro_rules! impl_stat_sum {
    ($($t:ty),* $(,)?) => {
        $(
            impl StatSum for $t {
                fn zero() -> Self {
                    0 as $t
                }

                fn plus(self, other: Self) -> Self {
                    self + other
                }

                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_stat_sum!(i64, u64, i128, u128, f64);

macro_rules! impl_stat_value {
    ($($t:ty => $sum:ty),* $(,)?) => {
        $(
            impl StatValue for $t {
                type Sum = $sum;

                fn widen(self) -> $sum {
                    self as $sum
                }
            }
        )*
    };
}

impl_stat_value!(
    i32 => i64,
    u32 => u64,
    i64 => i128,
    u64 => u128,
    usize => u128,
    f32 => f64,
    f64 => f64,
);

/// Count, sum, min, max and average of the values seen so far.
///
/// `min` and `max` are `None` and `average` is undefined until a value is accepted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats<N: StatValue> {
    count: u64,
    sum: N::Sum,
    min: Option<N>,
    max: Option<N>,
}

impl<N: StatValue> SummaryStats<N> {
    pub fn new() -> Self {
        Self {
            count: 0,
            sum: N::Sum::zero(),
            min: None,
            max: None,
        }
    }

    pub fn accept(&mut self, value: N) {
        self.count += 1;
        self.sum = self.sum.plus(value.widen());
        self.min = Some(match self.min {
            Some(min) if min <= value => min,
            _ => value,
        });
        self.max = Some(match self.max {
            Some(max) if max >= value => max,
            _ => value,
        });
    }

    /// Folds another partition's statistics into these.
    pub fn combine(mut self, other: Self) -> Self {
        self.count += other.count;
        self.sum = self.sum.plus(other.sum);
        self.min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(if b < a { b } else { a }),
            (a, b) => a.or(b),
        };
        self.max = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(if b > a { b } else { a }),
            (a, b) => a.or(b),
        };
        self
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sum of accepted values in the widened accumulator type.
    pub fn sum(&self) -> N::Sum {
        self.sum
    }

    pub fn min(&self) -> Option<N> {
        self.min
    }

    pub fn max(&self) -> Option<N> {
        self.max
    }

    /// `None` when no values were accepted.
    pub fn average(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum.to_f64() / self.count as f64)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl<N: StatValue> Default for SummaryStats<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: StatValue> FromIterator<N> for SummaryStats<N> {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        let mut stats = Self::new();
        for value in iter {
            stats.accept(value);
        }
        stats
    }
}

impl<N: StatValue + fmt::Display> fmt::Display for SummaryStats<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SummaryStats{{count={}, sum={}", self.count, self.sum)?;
        match (self.min, self.max, self.average()) {
            (Some(min), Some(max), Some(avg)) => {
                write!(f, ", min={}, average={:.6}, max={}}}", min, avg, max)
            }
            _ => write!(f, ", min=none, average=undefined, max=none}}"),
        }
    }
}
