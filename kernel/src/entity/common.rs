mod operation;
mod text;
mod time;

pub(in crate::entity) use self::text::*;
pub use self::{operation::*, time::*};
