//! Authorization token generators
//!
//! Each protocol has its own canonical message and they are never
//! interchangeable:
//! - [`management`]: `QBox` tokens over path and body
//! - [`qiniu`]: `Qiniu` tokens over method, path, host, content type and body
//! - [`download`]: signed, time-limited download URLs
//! - [`upload`]: upload tokens carrying an encoded [`crate::PutPolicy`]

pub mod download;
pub mod management;
pub mod qiniu;
pub mod upload;
