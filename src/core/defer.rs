//! 作用域退出时执行的延迟动作
//!
//! `Defer` 在离开作用域时恰好执行一次闭包，正常返回、提前 `return`、
//! `?` 传播错误以及 panic 展开都会触发。

/// 延迟动作守卫
///
/// # 示例
///
/// ```rust
/// use dist_mesh::core::defer::defer;
///
/// let _guard = defer(|| tracing::info!("teardown"));
/// // 作用域结束时打印 "teardown"
/// ```
#[must_use = "守卫被立即丢弃时动作会马上执行"]
pub struct Defer<F: FnOnce()> {
    action: Option<F>,
}

impl<F: FnOnce()> Defer<F> {
    pub fn new(action: F) -> Self {
        Self {
            action: Some(action),
        }
    }

    /// 解除守卫，动作不再执行
    pub fn cancel(mut self) {
        self.action = None;
    }
}

impl<F: FnOnce()> Drop for Defer<F> {
    fn drop(&mut self) {
        if let Some(action) = self.action.take() {
            action();
        }
    }
}

/// 创建一个延迟动作守卫
pub fn defer<F: FnOnce()>(action: F) -> Defer<F> {
    Defer::new(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_runs_once_on_scope_exit() {
        let count = Cell::new(0);
        {
            let _guard = defer(|| count.set(count.get() + 1));
            assert_eq!(count.get(), 0);
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_runs_on_early_return() {
        fn early(count: &Cell<u32>, bail: bool) -> u32 {
            let _guard = defer(|| count.set(count.get() + 1));
            if bail {
                return 0;
            }
            1
        }

        let count = Cell::new(0);
        assert_eq!(early(&count, true), 0);
        assert_eq!(early(&count, false), 1);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_runs_on_error_propagation() {
        fn fallible(count: &Cell<u32>) -> Result<(), String> {
            let _guard = defer(|| count.set(count.get() + 1));
            let _value: u32 = "not a number".parse().map_err(|_| "failed".to_string())?;
            Ok(())
        }

        let count = Cell::new(0);
        assert!(fallible(&count).is_err());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_runs_on_panic() {
        let count = Cell::new(0);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = defer(|| count.set(count.get() + 1));
            panic!("unwind");
        }));

        assert!(result.is_err());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_moved_guard_runs_once() {
        let count = Cell::new(0);
        let guard = defer(|| count.set(count.get() + 1));
        let moved = guard;
        drop(moved);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_cancel() {
        let count = Cell::new(0);
        let guard = defer(|| count.set(count.get() + 1));
        guard.cancel();
        assert_eq!(count.get(), 0);
    }
}
