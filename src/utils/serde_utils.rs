use serde::Serializer;

pub fn option_is_empty<T>(value: &Option<T>) -> bool {
    value.is_none()
}

pub fn vec_is_empty<T>(v: &Vec<T>) -> bool {
    v.is_empty()
}

/// Serializes any `Display` value as its string form.
pub fn as_display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: std::fmt::Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
