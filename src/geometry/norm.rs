use crate::r#type::IndexableNum;

/// The Euclidean length of a vector.
///
/// The plain sum of squares is used while it is a normal float. Once it overflows to `+inf` or
/// drops into the subnormal range, the components are divided by the largest magnitude before
/// squaring, so finite vectors keep a finite, accurate length.
pub(crate) fn euclidean_norm<N: IndexableNum, const D: usize>(components: &[N; D]) -> N {
    let sum = sum_of_squares(components);
    if sum.is_normal() {
        return sum.sqrt();
    }
    scaled_norm(components)
}

/// Like [`euclidean_norm`], but nudged down a few ulps on the rescaled path so that the result
/// never exceeds the exact length.
pub(crate) fn euclidean_norm_lower_bound<N: IndexableNum, const D: usize>(
    components: &[N; D],
) -> N {
    let sum = sum_of_squares(components);
    if sum.is_normal() {
        return sum.sqrt();
    }

    let norm = scaled_norm(components);
    if norm.is_finite() {
        let two = N::one() + N::one();
        norm - norm * N::epsilon() * two * two
    } else {
        norm
    }
}

#[inline]
fn sum_of_squares<N: IndexableNum, const D: usize>(components: &[N; D]) -> N {
    components.iter().fold(N::zero(), |acc, c| acc + *c * *c)
}

fn scaled_norm<N: IndexableNum, const D: usize>(components: &[N; D]) -> N {
    let scale = components
        .iter()
        .fold(N::zero(), |largest, c| largest.max(c.abs()));
    if scale == N::zero() || scale.is_infinite() {
        return scale;
    }

    let sum = components.iter().fold(N::zero(), |acc, c| {
        let ratio = *c / scale;
        acc + ratio * ratio
    });
    sum.sqrt() * scale
}
