pub mod encode;
pub mod randomness;
pub mod record;
pub mod round;
pub mod verify;
