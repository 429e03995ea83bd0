pub fn wrap_negative(index: i64, len: usize) -> i64 {
    if index < 0 {
        len as i64 + index
    } else {
        index
    }
}

pub fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let idx = wrap_negative(index, len);

    if idx < 0 || idx >= len as i64 {
        None
    } else {
        Some(idx as usize)
    }
}

/// Resolve optional slice bounds against a sequence length, returning the positions the slice
/// selects in order. `step` must not be zero.
pub fn slice_indices(
    start: Option<i64>,
    stop: Option<i64>,
    step: Option<i64>,
    len: usize,
) -> Vec<usize> {
    let step = step.unwrap_or(1);
    let len = len as i64;
    let mut indices = vec![];

    if step > 0 {
        let clamp = |i: i64| wrap_negative(i, len as usize).clamp(0, len);
        let start = start.map(clamp).unwrap_or(0);
        let stop = stop.map(clamp).unwrap_or(len);
        let mut i = start;
        while i < stop {
            indices.push(i as usize);
            i += step;
        }
    } else {
        let clamp = |i: i64| wrap_negative(i, len as usize).clamp(-1, len - 1);
        let start = start.map(clamp).unwrap_or(len - 1);
        let stop = stop.map(clamp).unwrap_or(-1);
        let mut i = start;
        while i > stop {
            indices.push(i as usize);
            i += step;
        }
    }

    indices
}
