use rand::Rng;
use rand_distr::{Beta, Distribution};
use shared::{Config, ConfigError, Population, TRAIT_BOUND};

/// Draw `n0` founder traits from Beta(z1, z2), mapped from [0, 1] onto
/// [-TRAIT_BOUND, TRAIT_BOUND].
pub fn sample_traits<R: Rng + ?Sized>(
    rng: &mut R,
    n0: usize,
    shape_a: f64,
    shape_b: f64,
) -> Result<Vec<f64>, ConfigError> {
    let beta = Beta::new(shape_a, shape_b).map_err(|_| ConfigError::TraitShape(shape_a, shape_b))?;

    Ok((0..n0)
        .map(|_| {
            let x: f64 = beta.sample(rng);
            (2.0 * x - 1.0) * TRAIT_BOUND
        })
        .collect())
}

/// Sample the founding population described by `config`.
pub fn initial_population<R: Rng + ?Sized>(
    rng: &mut R,
    config: &Config,
) -> Result<Population, ConfigError> {
    let params = config.params();
    let traits = sample_traits(
        rng,
        params.initial_population,
        params.trait_shape_a,
        params.trait_shape_b,
    )?;
    Ok(Population::from_traits(traits))
}
