//! Sampled scalar fields consumed by the classification stages.
//!
//! Every field is queried at normalized coordinates (u, v) in [0, 1] and
//! answers in [0, 1], so field resolution is independent of tile count.
//! The bundled implementations are noise-backed so a world can be grown
//! from a seed alone; callers may substitute any [`ScalarField`] (raster
//! heightmaps, test closures) without touching the pipeline.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// Resolution-independent scalar field contract.
pub trait ScalarField {
    /// Sample the field at normalized coordinates, returning a value in [0, 1].
    fn sample(&self, u: f64, v: f64) -> f64;
}

impl<F> ScalarField for F
where
    F: Fn(f64, f64) -> f64,
{
    fn sample(&self, u: f64, v: f64) -> f64 {
        self(u, v)
    }
}

/// Plain fractal noise field, used for rainfall and the woods mask.
pub struct NoiseField {
    fbm: Fbm<Perlin>,
    frequency: f64,
}

impl NoiseField {
    pub fn new(seed: u32, frequency: f64, octaves: usize) -> Self {
        let fbm = Fbm::<Perlin>::new(seed)
            .set_octaves(octaves)
            .set_frequency(1.0)
            .set_lacunarity(2.2)
            .set_persistence(0.5);
        Self { fbm, frequency }
    }
}

impl ScalarField for NoiseField {
    fn sample(&self, u: f64, v: f64) -> f64 {
        // Fbm output is roughly in [-1, 1]
        let raw = self.fbm.get([u * self.frequency, v * self.frequency]);
        ((raw + 1.0) * 0.5).clamp(0.0, 1.0)
    }
}

/// Heightmap: fractal noise shaped by a radial continent falloff, so land
/// masses gather toward the middle of the area and the rim stays sea.
pub struct ContinentField {
    fbm: Fbm<Perlin>,
    frequency: f64,
    falloff: f64,
}

impl ContinentField {
    pub fn new(seed: u32, frequency: f64, falloff: f64) -> Self {
        let fbm = Fbm::<Perlin>::new(seed)
            .set_octaves(5)
            .set_frequency(1.0)
            .set_lacunarity(2.5)
            .set_persistence(0.45);
        Self {
            fbm,
            frequency,
            falloff,
        }
    }
}

impl ScalarField for ContinentField {
    fn sample(&self, u: f64, v: f64) -> f64 {
        let nx = u * 2.0 - 1.0;
        let ny = v * 2.0 - 1.0;
        let distance = (nx * nx + ny * ny).sqrt();

        let noise = (self.fbm.get([u * self.frequency, v * self.frequency]) + 1.0) * 0.5;
        let shaped = noise - self.falloff * distance * distance;
        shaped.clamp(0.0, 1.0)
    }
}

/// Temperature: a latitude band (hot equator at v = 0.5, cold rims),
/// perturbed by low-frequency noise.
pub struct LatitudeField {
    perlin: Perlin,
    frequency: f64,
    perturbation: f64,
}

impl LatitudeField {
    pub fn new(seed: u32, frequency: f64, perturbation: f64) -> Self {
        Self {
            perlin: Perlin::new(seed),
            frequency,
            perturbation,
        }
    }
}

impl ScalarField for LatitudeField {
    fn sample(&self, u: f64, v: f64) -> f64 {
        let band = 1.0 - (v - 0.5).abs() * 2.0;
        let noise = self.perlin.get([u * self.frequency, v * self.frequency]);
        (band + noise * self.perturbation).clamp(0.0, 1.0)
    }
}

/// The full set of fields the pipeline samples, derived from one seed.
pub struct WorldFields {
    pub height: Box<dyn ScalarField>,
    pub temperature: Box<dyn ScalarField>,
    pub rainfall: Box<dyn ScalarField>,
    pub woods: Box<dyn ScalarField>,
}

impl WorldFields {
    /// Derive all four fields from the run seed. Each field gets its own
    /// stream so changing one frequency never reshuffles the others.
    pub fn from_seed(seed: u64) -> Self {
        let base = seed as u32;
        Self {
            height: Box::new(ContinentField::new(base, 3.0, 0.65)),
            temperature: Box::new(LatitudeField::new(base.wrapping_add(1), 4.0, 0.15)),
            rainfall: Box::new(NoiseField::new(base.wrapping_add(2), 3.5, 4)),
            woods: Box::new(NoiseField::new(base.wrapping_add(3), 6.0, 2)),
        }
    }
}
