use crate::{clamp_strength, normalize_rotation, MCError, MCFilter, MCResult, MCRotation, MCVector};

pub const MIN_ORDER: usize = 1;
pub const MAX_ORDER: usize = 3;

// Above this quaternion dot product slerp loses precision, blend linearly.
const NLERP_THRESHOLD: f32 = 0.9995;

/// A signal that can be blended toward a new sample.
pub trait Smoothable: Copy {
    /// Moves `self` toward `target` by the factor `alpha` in [0, 1].
    fn blend(&self, target: &Self, alpha: f32) -> Self;
}

impl Smoothable for f32 {
    fn blend(&self, target: &f32, alpha: f32) -> f32 {
        self + (target - self) * alpha
    }
}

impl Smoothable for MCVector {
    fn blend(&self, target: &MCVector, alpha: f32) -> MCVector {
        *self + (*target - *self) * alpha
    }
}

impl Smoothable for MCRotation {
    fn blend(&self, target: &MCRotation, alpha: f32) -> MCRotation {
        let from = normalize_rotation(self);
        let mut to = normalize_rotation(target);
        let mut dot = from.i * to.i + from.j * to.j + from.k * to.k + from.r * to.r;
        // shortest arc
        if dot < 0.0 {
            to = MCRotation::quaternion(-to.i, -to.j, -to.k, -to.r);
            dot = -dot;
        }
        if dot > NLERP_THRESHOLD {
            let blended = MCRotation::quaternion(
                from.i + (to.i - from.i) * alpha,
                from.j + (to.j - from.j) * alpha,
                from.k + (to.k - from.k) * alpha,
                from.r + (to.r - from.r) * alpha,
            );
            return normalize_rotation(&blended);
        }
        normalize_rotation(&from.slerp(&to, alpha))
    }
}

/// Cascade of 1 to 3 exponential smoothing stages sharing one strength.
/// Stage 0 follows the input, every further stage follows its predecessor.
pub struct CascadeFilter<T> {
    stages: Vec<T>,
    strength: f32,
}

pub type TranslationFilter = CascadeFilter<MCVector>;
pub type RotationFilter = CascadeFilter<MCRotation>;

impl<T: Smoothable> CascadeFilter<T> {
    /// Creates a filter with `order` stages seeded with `initial`.
    pub fn new(order: usize, strength: f32, initial: T) -> MCResult<CascadeFilter<T>> {
        if order < MIN_ORDER || order > MAX_ORDER {
            return Err(MCError::Configuration(format!(
                "invalid filter order: {}, expected {} to {}",
                order, MIN_ORDER, MAX_ORDER
            )));
        }
        Ok(CascadeFilter {
            stages: vec![initial; order],
            strength: clamp_strength(strength),
        })
    }

    fn alpha(&self) -> f32 {
        1.0 - self.strength
    }
}

impl<T: Smoothable> MCFilter<T> for CascadeFilter<T> {
    fn filter(&mut self, value: T) -> T {
        let alpha = self.alpha();
        let mut input = value;
        for stage in self.stages.iter_mut() {
            *stage = stage.blend(&input, alpha);
            input = *stage;
        }
        input
    }

    fn reset(&mut self, value: T) {
        for stage in self.stages.iter_mut() {
            *stage = value;
        }
    }

    fn set_strength(&mut self, strength: f32) -> f32 {
        self.strength = clamp_strength(strength);
        self.strength
    }

    fn strength(&self) -> f32 {
        self.strength
    }

    fn order(&self) -> usize {
        self.stages.len()
    }
}

pub fn translation_filter(order: usize, strength: f32) -> MCResult<Box<dyn MCFilter<MCVector>>> {
    let filter = TranslationFilter::new(order, strength, MCVector::zero())?;
    Ok(Box::new(filter))
}

pub fn rotation_filter(order: usize, strength: f32) -> MCResult<Box<dyn MCFilter<MCRotation>>> {
    let filter = RotationFilter::new(order, strength, MCRotation::identity())?;
    Ok(Box::new(filter))
}
