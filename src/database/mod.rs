// 数据存储模块，目前只有内存实现

pub mod repositories;

pub use repositories::user::UserRepository;
