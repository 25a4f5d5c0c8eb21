//! Building transforms out of smaller ones.

/// `x -> g(f(x))`
pub fn and_then<A, B, C, F, G>(f: F, g: G) -> impl Fn(A) -> C
where
    F: Fn(A) -> B,
    G: Fn(B) -> C,
{
    move |x| g(f(x))
}

/// `x -> f(g(x))`
pub fn compose<A, B, C, F, G>(f: F, g: G) -> impl Fn(A) -> C
where
    F: Fn(B) -> C,
    G: Fn(A) -> B,
{
    move |x| f(g(x))
}

pub fn identity<T>() -> impl Fn(T) -> T {
    |x| x
}
