//! Type probes the constructors and normalizers branch on.
//!
//! Callable and async-callable detection has no runtime counterpart here:
//! Rust resolves it at compile time, and a pipeline [`Step`](crate::Step)
//! reports which kind it holds through `is_sync`/`is_async`.

use std::any::Any;
use std::error::Error as StdError;

use crate::detach::Detach;
use crate::error::{Error, GetError, Panic};

/// True when a value is present.
///
/// # Example
///
/// ```rust
/// use shoal::predicate::is_defined;
///
/// assert!(is_defined(&Some(0)));
/// assert!(!is_defined(&None::<i32>));
/// ```
pub fn is_defined<T>(value: &Option<T>) -> bool {
    value.is_some()
}

/// True when mutation through another handle can reach the value.
///
/// This is the check the [`ok`](crate::ok) constructor runs before deciding
/// whether to copy its payload.
pub fn is_shared_mutable<T: Detach>(value: &T) -> bool {
    value.is_shared_mutable()
}

/// True when the value is an instance of `U`.
///
/// # Example
///
/// ```rust
/// use shoal::predicate::is_instance_of;
///
/// let value: Box<dyn std::any::Any> = Box::new(5u8);
/// assert!(is_instance_of::<u8>(value.as_ref()));
/// assert!(!is_instance_of::<i32>(value.as_ref()));
/// ```
pub fn is_instance_of<U: Any>(value: &dyn Any) -> bool {
    value.is::<U>()
}

/// True when the value is one of the error types an `Err` outcome carries.
///
/// Recognises the crate's [`Error`], [`Panic`] and [`GetError`], boxed
/// `dyn std::error::Error` trait objects, and `std::io::Error`.
pub fn is_error(value: &dyn Any) -> bool {
    value.is::<Error>()
        || value.is::<Panic>()
        || value.is::<GetError<Error>>()
        || value.is::<Box<dyn StdError + Send + Sync>>()
        || value.is::<Box<dyn StdError>>()
        || value.is::<std::io::Error>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_is_defined() {
        assert!(is_defined(&Some("x")));
        assert!(!is_defined::<&str>(&None));
    }

    #[test]
    fn test_is_shared_mutable() {
        assert!(is_shared_mutable(&Rc::new(RefCell::new(1i32))));
        assert!(!is_shared_mutable(&vec![1i32]));
    }

    #[test]
    fn test_is_error() {
        assert!(is_error(&Error::msg("x")));
        assert!(is_error(&std::io::Error::other("x")));
        let boxed: Box<dyn StdError + Send + Sync> = "boxed".into();
        assert!(is_error(&boxed));
        assert!(!is_error(&"not an error"));
        assert!(!is_error(&42i32));
    }

    #[test]
    fn test_is_instance_of() {
        assert!(is_instance_of::<String>(&String::from("s")));
        assert!(!is_instance_of::<&str>(&String::from("s")));
    }
}
