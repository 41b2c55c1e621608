// Platform collaborators: hand landmark sources and OS keyboard injection

pub mod hands;
pub mod input;
