use shared::Parameters;

/// Turbidity level the recurrence relaxes toward for a population of size `m`.
pub fn target_turbidity(m: usize, params: &Parameters) -> f64 {
    let h_m = params.half_saturation;
    params.background_turbidity * h_m / (h_m + m as f64 / params.carrying_capacity)
}

/// Advance turbidity by one timestep.
///
/// `m` is the population size at the end of the previous timestep. No clamping
/// is applied, so extreme growth rates can push turbidity below zero.
pub fn next_turbidity(turbidity: f64, m: usize, params: &Parameters) -> f64 {
    let target = target_turbidity(m, params);
    turbidity + params.turbidity_growth_rate * turbidity * (1.0 - turbidity / target)
}
