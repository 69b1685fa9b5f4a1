//! 浏览器存储封装模块
//!
//! 对 `web_sys::Storage` 的轻量封装，区分两个作用域：
//! - `LocalStorage`: 持久存储（"记住我"）
//! - `SessionStorage`: 会话级存储（浏览器会话结束即清除）

fn local() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

fn session() -> Option<web_sys::Storage> {
    web_sys::window()?.session_storage().ok()?
}

/// 持久存储封装
pub struct LocalStorage;

impl LocalStorage {
    /// 获取存储的字符串值；键不存在或出错时返回 None
    pub fn get(key: &str) -> Option<String> {
        local()?.get_item(key).ok()?
    }

    /// 设置存储值，返回是否成功
    pub fn set(key: &str, value: &str) -> bool {
        local().and_then(|s| s.set_item(key, value).ok()).is_some()
    }

    /// 删除键值对，返回是否成功
    pub fn delete(key: &str) -> bool {
        local().and_then(|s| s.remove_item(key).ok()).is_some()
    }
}

/// 会话级存储封装
pub struct SessionStorage;

impl SessionStorage {
    pub fn get(key: &str) -> Option<String> {
        session()?.get_item(key).ok()?
    }

    pub fn set(key: &str, value: &str) -> bool {
        session()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    pub fn delete(key: &str) -> bool {
        session()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}
