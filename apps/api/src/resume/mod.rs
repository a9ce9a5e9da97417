// Resume document core: the fixed slot template, the merge policy that keeps
// generated updates inside that template, and the completion scorer.

pub mod completeness;
pub mod merge;
pub mod template;
