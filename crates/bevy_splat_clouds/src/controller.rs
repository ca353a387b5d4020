//! Owns the live parameters and splats, and decides when to regenerate.

use bevy::prelude::*;

use crate::bounds::{BoundsError, CloudBounds};
use crate::params::{CloudParams, ColorSlot, ParamEffect, ParamField};
use crate::presets::{WeatherLibrary, WeatherPreset};
use crate::splats::SplatSet;
use crate::synth::{NOISE_TIME_SCALE, synthesize};
use crate::wind::animate;

/// Controller state. `Rebuilding` only exists for the duration of a
/// synchronous rebuild; callers always observe `Idle`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CloudPhase {
    #[default]
    Idle,
    Rebuilding,
}

/// The single owner of cloud state.
///
/// Parameter writes go through setters that consult
/// [`ParamField::effect`]: wind speed only changes the animation, anything
/// else regenerates the whole splat set. A rebuild builds the new set off to
/// the side and swaps it in, so readers never see a partial set.
#[derive(Resource, Debug)]
pub struct CloudController {
    params: CloudParams,
    bounds: CloudBounds,
    splats: SplatSet,
    generation: u64,
    phase: CloudPhase,
    elapsed: f64,
}

impl CloudController {
    /// Validate `bounds` and build the initial splat set.
    pub fn new(params: CloudParams, bounds: CloudBounds) -> Result<Self, BoundsError> {
        bounds.validate()?;
        let mut controller = Self {
            params,
            bounds,
            splats: SplatSet::default(),
            generation: 0,
            phase: CloudPhase::Idle,
            elapsed: 0.0,
        };
        controller.rebuild();
        Ok(controller)
    }

    pub fn params(&self) -> &CloudParams {
        &self.params
    }

    pub fn bounds(&self) -> &CloudBounds {
        &self.bounds
    }

    pub fn splats(&self) -> &SplatSet {
        &self.splats
    }

    /// Incremented once per completed rebuild.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> CloudPhase {
        self.phase
    }

    /// Clock seen by the last [`tick`](Self::tick), in seconds.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Write one numeric parameter.
    ///
    /// Returns the effect applied, or `None` if the value was unchanged (and
    /// nothing happened).
    pub fn set(&mut self, field: ParamField, value: f32) -> Option<ParamEffect> {
        if !self.params.set(field, value) {
            return None;
        }
        let effect = field.effect();
        if effect == ParamEffect::Rebuild {
            self.rebuild();
        }
        Some(effect)
    }

    pub fn set_wind_speed(&mut self, wind_speed: f32) -> Option<ParamEffect> {
        self.set(ParamField::WindSpeed, wind_speed)
    }

    /// Change a gradient colour. Returns `true` if it changed (and rebuilt).
    pub fn set_color(&mut self, slot: ColorSlot, color: Vec3) -> bool {
        if !self.params.set_color(slot, color) {
            return false;
        }
        self.rebuild();
        true
    }

    /// Overwrite the preset's declared fields, then rebuild exactly once.
    pub fn apply_preset(&mut self, preset: &WeatherPreset) {
        preset.apply_to(&mut self.params);
        self.rebuild();
    }

    /// Replace every parameter at once with a single rebuild.
    pub fn replace_params(&mut self, params: CloudParams) {
        self.params = params;
        self.rebuild();
    }

    /// Regenerate all splats from the current parameters.
    pub fn rebuild(&mut self) {
        self.phase = CloudPhase::Rebuilding;

        let count = self.params.effective_count();
        let mut next = synthesize(
            count,
            &self.params,
            &self.bounds,
            (self.elapsed * f64::from(NOISE_TIME_SCALE)) as f32,
        );
        // Place the new set at the current drift so the swap does not jump.
        animate(&mut next, self.elapsed, self.params.wind_speed, &self.bounds);

        self.splats = next;
        self.generation += 1;
        self.phase = CloudPhase::Idle;

        debug!(
            "Cloud rebuilt: generation {}, {} splats",
            self.generation, count
        );
    }

    /// Advance the animation clock and drift every splat.
    pub fn tick(&mut self, elapsed: f64, _delta: f32) {
        self.elapsed = elapsed;
        animate(
            &mut self.splats,
            elapsed,
            self.params.wind_speed,
            &self.bounds,
        );
    }

    /// Called by the renderer once it has uploaded the current records.
    pub fn mark_rendered(&mut self) {
        self.splats.mark_updated();
    }
}

/// Request to apply a preset from the [`WeatherLibrary`] by name.
#[derive(Message, Clone, Debug)]
pub struct ApplyWeatherPreset(pub String);

pub(crate) fn handle_apply_preset(
    mut messages: MessageReader<ApplyWeatherPreset>,
    library: Res<WeatherLibrary>,
    mut controller: ResMut<CloudController>,
) {
    for ApplyWeatherPreset(name) in messages.read() {
        let Some(preset) = library.get(name) else {
            warn!("Unknown weather preset '{}'", name);
            continue;
        };
        controller.apply_preset(preset);
        info!("Applied weather preset '{}'", name);
    }
}

pub(crate) fn advance_clouds(time: Res<Time>, mut controller: ResMut<CloudController>) {
    controller.tick(time.elapsed_secs_f64(), time.delta_secs());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::home_z;
    use crate::synth::synthesize_one;

    fn small_params() -> CloudParams {
        CloudParams {
            particle_count: 400,
            cloud_density: 0.5,
            ..default()
        }
    }

    fn controller() -> CloudController {
        CloudController::new(small_params(), CloudBounds::default()).unwrap()
    }

    #[test]
    fn new_builds_the_effective_count() {
        let controller = controller();
        assert_eq!(controller.generation(), 1);
        assert_eq!(controller.splats().len(), 200);
        assert_eq!(controller.phase(), CloudPhase::Idle);
    }

    #[test]
    fn invalid_bounds_fail_at_construction() {
        let bounds = CloudBounds::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0));
        assert!(CloudController::new(CloudParams::default(), bounds).is_err());
    }

    #[test]
    fn wind_speed_does_not_rebuild() {
        let mut controller = controller();
        assert_eq!(controller.set_wind_speed(0.8), Some(ParamEffect::Drift));
        assert_eq!(controller.generation(), 1);
        assert_eq!(controller.params().wind_speed, 0.8);
    }

    #[test]
    fn shape_parameters_rebuild() {
        let mut controller = controller();
        let writes = [
            (ParamField::Opacity, 0.9),
            (ParamField::Fluffiness, 1.5),
            (ParamField::Turbulence, 0.1),
            (ParamField::CloudDensity, 1.0),
            (ParamField::Octaves, 6.0),
            (ParamField::Frequency, 0.8),
        ];
        for (i, (field, value)) in writes.into_iter().enumerate() {
            assert_eq!(controller.set(field, value), Some(ParamEffect::Rebuild));
            assert_eq!(controller.generation(), 2 + i as u64, "{field:?}");
        }
        assert_eq!(controller.splats().len(), 400);
    }

    #[test]
    fn unchanged_writes_are_ignored() {
        let mut controller = controller();
        let opacity = controller.params().opacity;
        assert_eq!(controller.set(ParamField::Opacity, opacity), None);
        assert!(!controller.set_color(ColorSlot::Top, Vec3::ONE));
        assert_eq!(controller.generation(), 1);
    }

    #[test]
    fn color_change_rebuilds() {
        let mut controller = controller();
        assert!(controller.set_color(ColorSlot::Top, Vec3::new(0.9, 0.5, 0.5)));
        assert_eq!(controller.generation(), 2);
    }

    #[test]
    fn preset_rebuilds_exactly_once() {
        let mut controller = controller();
        let library = WeatherLibrary::default();
        let storm = library.get("Storm").unwrap();
        controller.apply_preset(storm);
        assert_eq!(controller.generation(), 2);
        assert_eq!(controller.params().wind_speed, -0.7);
        assert_eq!(controller.splats().len(), 30_000);
        // Not declared by the preset.
        assert_eq!(controller.params().noise, small_params().noise);
    }

    #[test]
    fn rebuild_with_same_params_reproduces_splats() {
        let mut controller = controller();
        let before = controller.splats().records().to_vec();
        controller.rebuild();
        assert_eq!(controller.splats().records(), before.as_slice());
    }

    #[test]
    fn tick_drifts_from_home() {
        let mut controller = controller();
        controller.tick(4.0, 0.016);
        let bounds = *controller.bounds();
        let wind = controller.params().wind_speed;
        for (index, splat) in controller.splats().iter().enumerate() {
            let home = home_z(index as u32, bounds.min.z, bounds.max.z);
            let expected = crate::bounds::wrap(home + wind * 4.0, bounds.min.z, bounds.max.z);
            let range = bounds.max.z - bounds.min.z;
            let gap = (splat.center.z - expected).rem_euclid(range);
            assert!(gap.min(range - gap) < 1e-4);
        }
        assert_eq!(controller.elapsed(), 4.0);
    }

    #[test]
    fn ticks_keep_moving_after_days_of_uptime() {
        let mut controller = controller();
        let wind = controller.params().wind_speed;
        let bounds = *controller.bounds();
        let range = bounds.max.z - bounds.min.z;
        let frame = 1.0 / 60.0;
        let start = 12.0 * 86_400.0;

        controller.tick(start, frame as f32);
        let before: Vec<f32> = controller.splats().iter().map(|s| s.center.z).collect();
        controller.tick(start + frame, frame as f32);

        for (z0, splat) in before.iter().zip(controller.splats().iter()) {
            let mut step = (splat.center.z - z0).rem_euclid(range);
            if step > range * 0.5 {
                step -= range;
            }
            assert!((step - wind * frame as f32).abs() < 1e-4, "step {step}");
        }
    }

    #[test]
    fn tick_keeps_base_attributes() {
        let mut controller = controller();
        controller.tick(2.0, 0.016);
        for (index, splat) in controller.splats().iter().enumerate() {
            let base = synthesize_one(index as u32, controller.params(), controller.bounds(), 0.0);
            assert_eq!(splat.center.x, base.center.x);
            assert_eq!(splat.center.y, base.center.y);
            assert_eq!(splat.color, base.color);
            assert_eq!(splat.opacity, base.opacity);
        }
    }

    #[test]
    fn rebuild_lands_at_the_current_drift() {
        let mut controller = controller();
        controller.tick(9.0, 0.016);
        controller.set(ParamField::Turbulence, 0.9);
        let wind = controller.params().wind_speed;
        let base = synthesize(
            controller.splats().len(),
            controller.params(),
            controller.bounds(),
            9.0 * NOISE_TIME_SCALE,
        );
        for (index, (splat, base)) in controller.splats().iter().zip(base.iter()).enumerate() {
            assert_eq!(splat.center.x, base.center.x);
            assert_eq!(splat.center.y, base.center.y);
            let z = crate::wind::drifted_z(index as u32, 9.0, wind, controller.bounds());
            assert_eq!(splat.center.z, z);
        }
    }

    #[test]
    fn mark_rendered_clears_the_dirty_flag() {
        let mut controller = controller();
        assert!(controller.splats().needs_update());
        controller.mark_rendered();
        assert!(!controller.splats().needs_update());
        controller.tick(1.0, 1.0);
        assert!(controller.splats().needs_update());
    }

    #[test]
    fn zero_density_yields_an_empty_cloud() {
        let mut controller = controller();
        controller.replace_params(CloudParams {
            particle_count: 0,
            ..default()
        });
        assert!(controller.splats().is_empty());
        controller.tick(5.0, 0.1);
        assert!(controller.splats().is_empty());
    }
}
