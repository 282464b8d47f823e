//! Invariant checks excluded from coverage reports.
//!
//! Grammar construction defects panic here; ordinary input errors never do.

#![cfg_attr(coverage_nightly, coverage(off))]

use std::any::Any;
use std::rc::Rc;

use crate::parser::{AnyParser, Output};

#[inline]
pub fn ensure_children(label: &str, children: &[AnyParser]) {
    assert!(
        !children.is_empty(),
        "branch: \"{label}\" has no children (a branch composes at least one parser)"
    );
}

#[inline]
pub fn ensure_output_type<T: 'static>(output: Output) -> T {
    match output.downcast::<T>() {
        Ok(output) => *output,
        Err(_) => panic!(
            "downcast: parser output is not a {} (child types must match the combinator)",
            std::any::type_name::<T>()
        ),
    }
}

#[inline]
pub fn ensure_slot_type<T: 'static>(slot: Rc<dyn Any>) -> Rc<T> {
    match slot.downcast::<T>() {
        Ok(slot) => slot,
        Err(_) => panic!(
            "downcast: parser output is not a {} (slot types must match the children)",
            std::any::type_name::<T>()
        ),
    }
}

#[cold]
pub fn safe_spot_over_branch(label: &str) -> ! {
    panic!("safe_spot: \"{label}\" is a branch parser (only leaf parsers can be safe spots)")
}

#[cold]
pub fn safe_spot_never(label: &str) -> ! {
    panic!("safe_spot: \"{label}\" has a forbidden recoverer (it may match without consuming input)")
}

#[cold]
pub fn safe_spot_accepts_empty(label: &str) -> ! {
    panic!("safe_spot: \"{label}\" matches empty input (safe spots must consume input)")
}

#[cold]
pub fn leaf_resumed(label: &str) -> ! {
    panic!("resume: \"{label}\" is a leaf parser (only branches have children to resume)")
}

#[cold]
pub fn lazy_reentered() -> ! {
    panic!("lazy: factory used the parser it is building (use recursive for self-reference)")
}

#[cold]
pub fn recursive_undefined() -> ! {
    panic!("recursive: parser used before its definition finished")
}

#[cold]
pub fn recursive_is_self() -> ! {
    panic!("recursive: definition returned its own handle (it would never consume input)")
}
