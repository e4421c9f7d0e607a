pub mod common_suffix_len;
pub mod lcs;
pub mod side;
pub mod string_builder;
