//! 对象缓存层
//!
//! 后端以插件形式注册（见 [`declare_object_cache_plugin!`]），启动时按
//! `cache.type` 选择。目前用于 JWT 用户查询与课程大纲。

pub mod object_cache;
pub mod register;
mod traits;

pub use traits::*;

/// 课程大纲缓存键
pub fn course_outline_key(course_id: i64) -> String {
    format!("course_outline:{course_id}")
}

/// 按 token 缓存的用户信息键
pub fn user_token_key(token: &str) -> String {
    format!("user:{token}")
}

/// 声明并在加载时注册一个缓存插件
///
/// 插件类型需要提供 `fn new() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                    Box::pin(async {
                        <$ty>::new()
                            .map(|cache| {
                                Box::new(cache) as Box<dyn $crate::cache::ObjectCache>
                            })
                            .map_err($crate::errors::LearnHubError::cache_connection)
                    })
                }),
            );
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_keys() {
        assert_eq!(course_outline_key(42), "course_outline:42");
        assert_eq!(user_token_key("abc"), "user:abc");
    }
}
