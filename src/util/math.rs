//! Small numeric helpers shared by the suppression loops.

/// Returns the index of the first maximum, or `None` for an empty input.
///
/// NaN never wins against a comparable value.
pub(crate) fn argmax_first<I>(values: I) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut iter = values.into_iter().enumerate();
    let (mut best_idx, mut best) = iter.next()?;
    for (idx, value) in iter {
        if value > best || (best.is_nan() && !value.is_nan()) {
            best_idx = idx;
            best = value;
        }
    }
    Some(best_idx)
}

/// Returns the index of the first minimum, or `None` for an empty input.
pub(crate) fn argmin_first<I>(values: I) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    argmax_first(values.into_iter().map(|v| -v))
}
