use std::sync::{Arc, LazyLock};

use crate::number::Number64;

/// Literal values.
///
/// Literals are shared behind [`Arc`]: build them with the constructors on
/// this type, which hand out pooled instances for `null`, `undefined`, the
/// booleans, and small integral numbers.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Undefined,
    Boolean(bool),
    Number(Number64),
    String(String),
}

/// Integral numbers in `-POOL_BOUND..POOL_BOUND` are pooled.
const POOL_BOUND: i64 = 256;

static NULL: LazyLock<Arc<Literal>> = LazyLock::new(|| Arc::new(Literal::Null));
static UNDEFINED: LazyLock<Arc<Literal>> = LazyLock::new(|| Arc::new(Literal::Undefined));
static TRUE: LazyLock<Arc<Literal>> = LazyLock::new(|| Arc::new(Literal::Boolean(true)));
static FALSE: LazyLock<Arc<Literal>> = LazyLock::new(|| Arc::new(Literal::Boolean(false)));

static FREQUENT_INTEGERS: LazyLock<Vec<Arc<Literal>>> = LazyLock::new(|| {
    (-POOL_BOUND..POOL_BOUND)
        .map(|i| Arc::new(Literal::Number(Number64::from_integer(i))))
        .collect()
});

static FREQUENT_DOUBLES: LazyLock<Vec<Arc<Literal>>> = LazyLock::new(|| {
    (-POOL_BOUND..POOL_BOUND)
        .map(|i| Arc::new(Literal::Number(Number64::from_double(i as f64))))
        .collect()
});

impl Literal {
    pub fn null() -> Arc<Literal> {
        Arc::clone(&NULL)
    }

    pub fn undefined() -> Arc<Literal> {
        Arc::clone(&UNDEFINED)
    }

    pub fn boolean(value: bool) -> Arc<Literal> {
        if value {
            Arc::clone(&TRUE)
        } else {
            Arc::clone(&FALSE)
        }
    }

    /// Number literal, pooled when the value is a small integer or a small
    /// integral double.
    pub fn number(value: Number64) -> Arc<Literal> {
        if value.is_integer() {
            let i = value.to_integer();
            if (-POOL_BOUND..POOL_BOUND).contains(&i) {
                return Arc::clone(&FREQUENT_INTEGERS[(i + POOL_BOUND) as usize]);
            }
        } else {
            let d = value.to_double();
            let pooled = d.fract() == 0.0
                && d >= -(POOL_BOUND as f64)
                && d < POOL_BOUND as f64
                && !(d == 0.0 && d.is_sign_negative());
            if pooled {
                return Arc::clone(&FREQUENT_DOUBLES[(d as i64 + POOL_BOUND) as usize]);
            }
        }
        Arc::new(Literal::Number(value))
    }

    pub fn string(value: impl Into<String>) -> Arc<Literal> {
        Arc::new(Literal::String(value.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_numbers_are_pooled() {
        let a = Literal::number(Number64::from_integer(42));
        let b = Literal::number(Number64::from_integer(42));
        assert!(Arc::ptr_eq(&a, &b));

        let c = Literal::number(Number64::from_double(-3.0));
        let d = Literal::number(Number64::from_double(-3.0));
        assert!(Arc::ptr_eq(&c, &d));
    }

    #[test]
    fn test_integer_and_double_pools_are_distinct() {
        let int = Literal::number(Number64::from_integer(7));
        let double = Literal::number(Number64::from_double(7.0));
        assert!(!Arc::ptr_eq(&int, &double));
        match (&*int, &*double) {
            (Literal::Number(i), Literal::Number(d)) => {
                assert!(i.is_integer());
                assert!(d.is_double());
            }
            _ => panic!("Expected number literals"),
        }
    }

    #[test]
    fn test_large_numbers_are_not_pooled() {
        let a = Literal::number(Number64::from_integer(1000));
        let b = Literal::number(Number64::from_integer(1000));
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a, b);
    }

    #[test]
    fn test_singletons() {
        assert!(Arc::ptr_eq(&Literal::null(), &Literal::null()));
        assert!(Arc::ptr_eq(&Literal::boolean(true), &Literal::boolean(true)));
        assert_eq!(*Literal::undefined(), Literal::Undefined);
    }
}
