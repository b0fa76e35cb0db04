/// Runs `func` with `arg` when the returned guard goes out of scope, on every
/// exit path including early returns through `?`.
pub fn finally<A, F>(arg: A, func: F) -> FinallyGuard<A, F>
where
    F: FnMut(&mut A),
{
    FinallyGuard { arg, func }
}

pub struct FinallyGuard<A, F>
where
    F: FnMut(&mut A),
{
    arg: A,
    func: F,
}

impl<A, F> FinallyGuard<A, F>
where
    F: FnMut(&mut A),
{
    /// Disarms the guard.
    pub fn forget(self) {
        ::std::mem::forget(self);
    }
}

impl<A, F> Drop for FinallyGuard<A, F>
where
    F: FnMut(&mut A),
{
    fn drop(&mut self) {
        (self.func)(&mut self.arg)
    }
}
