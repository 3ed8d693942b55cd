use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lin_alg::f32::Vec3;
use molstar_mol::{AtomSite, Element, Loci, Structure};
use molstar_plugin::animation::model_index::Direction;
use molstar_plugin::{
    AnimateModelIndex, AnimationContext, AnimationDisplay, AnimationInstance, AnimationRunner,
    AnimationTime, ApplyResult, ModelIndexMode, ModelIndexParams, ModelIndexState, PluginContext, PluginError,
    PluginResult, PluginStateAnimation, TickStatus,
};
use molstar_repr::task::BoxFuture;
use molstar_repr::{
    spacefill_representation, ComplexRepresentation, MarkerAction, Params, PickingId, RenderObject,
    ReprError, ReprResult, Representation, RepresentationContext, Theme, Values, Visual,
    VisualContext,
};
use parking_lot::Mutex;

fn frame(offset: f32) -> Arc<Structure> {
    Arc::new(Structure::from_atoms(
        "frame",
        vec![
            AtomSite::new("O", Element::OXYGEN, Vec3::new(offset, 0.0, 0.0), "A"),
            AtomSite::new("H1", Element::HYDROGEN, Vec3::new(offset + 1.0, 0.0, 0.0), "A"),
        ],
    ))
}

fn plugin(frames: usize) -> PluginContext {
    PluginContext::new(RepresentationContext::default())
        .with_trajectory((0..frames).map(|i| frame(i as f32)).collect())
}

fn model_index(mode: ModelIndexMode) -> AnimationInstance<AnimateModelIndex> {
    let params = ModelIndexParams {
        mode,
        direction: Direction::Forward,
        fps: 10.0,
    };
    AnimationInstance::new(Arc::new(AnimateModelIndex), params)
}

/// Tick every 100 ms and collect the frame after each applied tick
async fn frames_visited(
    runner: &mut AnimationRunner<AnimateModelIndex>,
    ctx: &mut PluginContext,
    ticks: usize,
) -> Vec<usize> {
    let mut visited = Vec::new();
    for i in 1..=ticks {
        match runner.tick(ctx, i as f64 * 100.0).await.unwrap() {
            TickStatus::Applied => visited.push(ctx.current_frame()),
            TickStatus::Finished | TickStatus::Stopped => break,
            TickStatus::Skipped => {}
        }
    }
    visited
}

#[tokio::test]
async fn loop_rebinds_representations() {
    let mut ctx = plugin(3);
    let index = ctx
        .add_representation(Box::new(spacefill_representation()), Values::new())
        .await
        .unwrap();

    let instance = model_index(ModelIndexMode::Loop);
    let mut runner = AnimationRunner::new(instance);
    runner.start(&mut ctx, 0.0).await.unwrap();

    assert_eq!(runner.tick(&mut ctx, 50.0).await.unwrap(), TickStatus::Skipped);
    assert_eq!(frames_visited(&mut runner, &mut ctx, 4).await, vec![1, 2, 0, 1]);

    let repr = &ctx.representations()[index];
    assert!(Arc::ptr_eq(repr.structure().unwrap(), ctx.frame(1).unwrap()));
    assert_eq!(repr.version(), Some(4));
    assert_eq!(repr.render_objects().len(), 1);
}

#[tokio::test]
async fn palindrome_reverses_at_the_ends() {
    let mut ctx = plugin(3);
    let mut runner = AnimationRunner::new(model_index(ModelIndexMode::Palindrome));
    runner.start(&mut ctx, 0.0).await.unwrap();
    assert_eq!(frames_visited(&mut runner, &mut ctx, 5).await, vec![1, 2, 1, 0, 1]);
}

#[tokio::test]
async fn saved_state_resumes_direction() {
    let mut ctx = plugin(3);
    let mut runner = AnimationRunner::new(model_index(ModelIndexMode::Palindrome));
    runner.start(&mut ctx, 0.0).await.unwrap();
    assert_eq!(frames_visited(&mut runner, &mut ctx, 3).await, vec![1, 2, 1]);

    let saved = serde_json::to_string(runner.state().unwrap()).unwrap();
    runner.stop(&mut ctx).await.unwrap();
    let state: ModelIndexState = serde_json::from_str(&saved).unwrap();
    assert_eq!(state.direction, Direction::Backward);
    assert_eq!(state.frame_ms, 100.0);

    let mut resumed = AnimationRunner::new(model_index(ModelIndexMode::Palindrome));
    resumed.resume(&mut ctx, state, 0.0).await.unwrap();
    assert_eq!(frames_visited(&mut resumed, &mut ctx, 2).await, vec![0, 1]);
}

#[tokio::test]
async fn once_finishes_and_stops() {
    let mut ctx = plugin(3);
    let mut runner = AnimationRunner::new(model_index(ModelIndexMode::Once));
    runner.start(&mut ctx, 0.0).await.unwrap();

    assert_eq!(frames_visited(&mut runner, &mut ctx, 10).await, vec![1, 2]);
    assert!(!runner.is_running());
    assert_eq!(runner.tick(&mut ctx, 2000.0).await.unwrap(), TickStatus::Stopped);
    assert_eq!(ctx.current_frame(), 2);
}

#[tokio::test]
async fn single_frame_cannot_be_animated() {
    let mut ctx = plugin(1);
    let mut runner = AnimationRunner::new(model_index(ModelIndexMode::Loop));
    let err = runner.start(&mut ctx, 0.0).await.unwrap_err();
    assert!(matches!(err, PluginError::CannotApply { .. }));
    assert!(!runner.is_running());
}

#[test]
fn durations() {
    let ctx = plugin(3);
    let once = model_index(ModelIndexMode::Once);
    assert_eq!(once.duration_ms(&ctx), Some(200.0));
    assert_eq!(once.clone().with_custom_duration(500.0).duration_ms(&ctx), Some(500.0));
    assert_eq!(once.clone().with_custom_duration(0.0).duration_ms(&ctx), Some(200.0));
    assert_eq!(model_index(ModelIndexMode::Loop).duration_ms(&ctx), None);
    assert_eq!(model_index(ModelIndexMode::Once).duration_ms(&plugin(0)), None);
}

#[tokio::test]
async fn frame_errors() {
    let mut empty = plugin(0);
    let err = empty
        .add_representation(Box::new(spacefill_representation()), Values::new())
        .await
        .unwrap_err();
    assert_eq!(err, PluginError::NoTrajectory);
    assert_eq!(empty.set_frame(0).await.unwrap_err(), PluginError::NoTrajectory);

    let mut ctx = plugin(2);
    assert_eq!(
        ctx.set_frame(5).await.unwrap_err(),
        PluginError::FrameOutOfRange { index: 5, count: 2 }
    );
    ctx.set_frame(1).await.unwrap();
    assert_eq!(ctx.current_frame(), 1);
}

/// Builds nothing, and only accepts two-atom structures
struct PairsOnly;

impl Visual for PairsOnly {
    fn create_or_update(
        &mut self,
        _: VisualContext,
        _: Theme,
        _: Values,
        structure: Option<Arc<Structure>>,
    ) -> BoxFuture<'_, ReprResult<()>> {
        Box::pin(async move {
            match structure {
                Some(s) if s.element_count() != 2 => Err(ReprError::Build("not a pair".to_string())),
                _ => Ok(()),
            }
        })
    }

    fn render_object(&self) -> Option<&Arc<RenderObject>> {
        None
    }

    fn get_loci(&self, _: &PickingId) -> Loci {
        Loci::Empty
    }

    fn mark(&mut self, _: &Loci, _: MarkerAction) -> bool {
        false
    }

    fn set_visibility(&mut self, _: bool) {}

    fn set_pickable(&mut self, _: bool) {}

    fn destroy(&mut self) {}
}

fn no_params(_: &RepresentationContext, _: &Structure) -> Params {
    Params::new()
}

#[tokio::test]
async fn failed_rebind_keeps_current_frame() {
    let triple = Arc::new(Structure::from_atoms(
        "triple",
        (0..3).map(|i| AtomSite::new("C", Element::CARBON, Vec3::new(i as f32, 0.0, 0.0), "A")),
    ));
    let mut ctx = PluginContext::new(RepresentationContext::default())
        .with_trajectory(vec![frame(0.0), triple]);
    let spacefill = ctx
        .add_representation(Box::new(spacefill_representation()), Values::new())
        .await
        .unwrap();
    ctx.add_representation(
        Box::new(ComplexRepresentation::new("Pairs", no_params, || PairsOnly)),
        Values::new(),
    )
    .await
    .unwrap();

    let err = ctx.set_frame(1).await.unwrap_err();
    assert_eq!(err, PluginError::Repr(ReprError::Build("not a pair".to_string())));
    assert_eq!(ctx.current_frame(), 0);
    assert!(Arc::ptr_eq(ctx.current_structure().unwrap(), ctx.frame(0).unwrap()));
    // Rebound before the failure
    let repr = &ctx.representations()[spacefill];
    assert!(Arc::ptr_eq(repr.structure().unwrap(), ctx.frame(1).unwrap()));

    ctx.set_frame(0).await.unwrap();
    assert_eq!(ctx.current_frame(), 0);
}

/// Counts to three, skipping until 50 ms passed since the last applied frame
#[derive(Debug, Default)]
struct CountToThree {
    times: Mutex<Vec<AnimationTime>>,
    setups: AtomicUsize,
    teardowns: AtomicUsize,
}

impl PluginStateAnimation for CountToThree {
    type Params = ();
    type State = u32;

    fn name(&self) -> &str {
        "test.count-to-three"
    }

    fn display(&self) -> AnimationDisplay {
        AnimationDisplay {
            name: "Count".to_string(),
            description: None,
        }
    }

    fn params(&self, _: &PluginContext) {}

    fn initial_state(&self, _: &(), _: &PluginContext) -> u32 {
        0
    }

    fn setup<'a>(&'a self, _: &'a (), _: &'a mut PluginContext) -> BoxFuture<'a, PluginResult<()>> {
        self.setups.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { Ok(()) })
    }

    fn teardown<'a>(
        &'a self,
        _: &'a (),
        _: &'a u32,
        _: &'a mut PluginContext,
    ) -> BoxFuture<'a, PluginResult<()>> {
        self.teardowns.fetch_add(1, Ordering::SeqCst);
        Box::pin(async { Ok(()) })
    }

    fn apply<'a>(
        &'a self,
        state: &'a u32,
        time: AnimationTime,
        _: AnimationContext<'a, ()>,
    ) -> BoxFuture<'a, PluginResult<ApplyResult<u32>>> {
        Box::pin(async move {
            self.times.lock().push(time);
            if *state == 3 {
                Ok(ApplyResult::Finished)
            } else if time.current - time.last_applied < 50.0 {
                Ok(ApplyResult::Skip)
            } else {
                Ok(ApplyResult::Next(state + 1))
            }
        })
    }
}

#[tokio::test]
async fn runner_tracks_last_applied_time() {
    let mut ctx = plugin(0);
    let animation = Arc::new(CountToThree::default());
    let mut runner = AnimationRunner::new(AnimationInstance::new(Arc::clone(&animation), ()));

    runner.start(&mut ctx, 1000.0).await.unwrap();
    let mut statuses = Vec::new();
    for now in [1020.0, 1060.0, 1080.0, 1120.0, 1200.0, 1210.0] {
        statuses.push(runner.tick(&mut ctx, now).await.unwrap());
    }

    assert_eq!(
        statuses,
        vec![
            TickStatus::Skipped,
            TickStatus::Applied,
            TickStatus::Skipped,
            TickStatus::Applied,
            TickStatus::Applied,
            TickStatus::Finished,
        ]
    );
    let last_applied: Vec<f64> = animation.times.lock().iter().map(|t| t.last_applied).collect();
    assert_eq!(last_applied, vec![0.0, 0.0, 60.0, 60.0, 120.0, 200.0]);
    assert_eq!(animation.setups.load(Ordering::SeqCst), 1);
    assert_eq!(animation.teardowns.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn restart_tears_down_previous_run() {
    let mut ctx = plugin(0);
    let animation = Arc::new(CountToThree::default());
    let mut runner = AnimationRunner::new(AnimationInstance::new(Arc::clone(&animation), ()));

    runner.start(&mut ctx, 0.0).await.unwrap();
    runner.start(&mut ctx, 10.0).await.unwrap();
    assert_eq!(animation.setups.load(Ordering::SeqCst), 2);
    assert_eq!(animation.teardowns.load(Ordering::SeqCst), 1);
    assert_eq!(runner.state(), Some(&0));

    runner.stop(&mut ctx).await.unwrap();
    runner.stop(&mut ctx).await.unwrap();
    assert_eq!(animation.teardowns.load(Ordering::SeqCst), 2);
}
