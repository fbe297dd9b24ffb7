pub mod access_policy;
pub mod password_strength;
pub mod points_rank;
