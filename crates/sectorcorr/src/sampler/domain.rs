use super::{PointSampler, ReplayToken};
use crate::error::CorrError;
use crate::geom::{Bbox2, Point, Polygon};
use nalgebra::Vector2;
use rand::Rng;

/// Uniform points inside an arbitrary polygon by oversample-and-filter.
///
/// Draws `oversample * count` points in the domain's bounding box, keeps those
/// inside, truncates to `count`. Too few survivors is an error, never a short
/// result.
#[derive(Clone, Debug)]
pub struct DomainSampler<'a> {
    domain: &'a Polygon,
    bbox: Bbox2,
    oversample: usize,
}

impl<'a> DomainSampler<'a> {
    pub fn new(domain: &'a Polygon, oversample: usize) -> Result<Self, CorrError> {
        if oversample == 0 {
            return Err(CorrError::config("oversampling factor must be >= 1"));
        }
        let bbox = domain.bbox();
        if bbox.is_degenerate() {
            return Err(CorrError::config("sampling domain has a zero-area bounding box"));
        }
        // Collinear rings pass the bbox check but can never contain a draw.
        if !(domain.area() > 0.0) {
            return Err(CorrError::config("sampling domain has zero area"));
        }
        Ok(Self {
            domain,
            bbox,
            oversample,
        })
    }

    #[inline]
    pub(crate) fn draw_in_bbox<R: Rng>(&self, rng: &mut R) -> Point {
        Vector2::new(
            self.bbox.min.x + rng.gen::<f64>() * self.bbox.width(),
            self.bbox.min.y + rng.gen::<f64>() * self.bbox.height(),
        )
    }

    pub(crate) fn bbox(&self) -> Bbox2 {
        self.bbox
    }
}

impl PointSampler for DomainSampler<'_> {
    fn sample(&self, count: usize, tok: ReplayToken) -> Result<Vec<Point>, CorrError> {
        let draws = count.checked_mul(self.oversample).ok_or_else(|| {
            CorrError::config("requested point count overflows the draw budget")
        })?;
        let mut rng = tok.rng();
        let mut kept = Vec::with_capacity(count);
        for _ in 0..draws {
            if kept.len() == count {
                break;
            }
            let p = self.draw_in_bbox(&mut rng);
            if self.domain.contains(p) {
                kept.push(p);
            }
        }
        if kept.len() < count {
            return Err(CorrError::SamplingInsufficiency {
                requested: count,
                obtained: kept.len(),
            });
        }
        Ok(kept)
    }
}
