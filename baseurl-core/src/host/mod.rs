mod allow_list;
mod normalize;

pub use allow_list::*;
pub use normalize::*;
