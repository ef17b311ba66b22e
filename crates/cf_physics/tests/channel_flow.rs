// crates/cf_physics/tests/channel_flow.rs

//! 槽道流端到端测试

use cf_io::{FileGraphWriter, GraphFormat, JsonFieldWriter, MemoryFieldWriter, MemoryGraphWriter};
use cf_mesh::{ChannelMesh, ChannelMeshBuilder, MeshAccess};
use cf_physics::numerics::linear_algebra::SolverConfig;
use cf_physics::{
    FlowState, FvMomentumSystem, Laminar, MixingLength, MixingLengthParams, ProfileRecorder,
    SolverLoop, TimeControl, TurbulenceModel, WriteControl, PROFILE_NAMES,
};
use glam::DVec3;

fn memory_recorder() -> ProfileRecorder {
    ProfileRecorder::new(Box::new(MemoryGraphWriter::new()), Box::new(MemoryFieldWriter::new()))
}

fn build(
    mesh: ChannelMesh,
    ubar: f64,
    steps: usize,
    turbulence: Box<dyn TurbulenceModel>,
    recorder: ProfileRecorder,
) -> SolverLoop<ChannelMesh> {
    let state = FlowState::new(&mesh, DVec3::new(ubar, 0.0, 0.0), DVec3::ZERO, DVec3::ZERO).unwrap();
    let time = TimeControl::new(0.0, steps as f64, 1.0, WriteControl::TimeStep, 100.0).unwrap();
    let momentum = Box::new(FvMomentumSystem::new(0.5, SolverConfig::new(1e-12, 1000)));
    SolverLoop::new(mesh, state, time, turbulence, momentum, recorder).unwrap()
}

#[test]
fn laminar_channel_converges_to_poiseuille() {
    let nu = 0.01;
    let mesh = ChannelMeshBuilder::new().cells(20).height(2.0).build().unwrap();
    let turbulence = Box::new(Laminar::new(&mesh, nu));
    let mut solver = build(mesh, 1.0, 400, turbulence, memory_recorder());

    let summary = solver.run().unwrap();
    assert_eq!(summary.steps, 400);

    // 半高 h = 1：gradP = 3 ν Ubar / h²
    let expected = 3.0 * nu;
    assert!(
        ((summary.body_force.x - expected) / expected).abs() < 0.01,
        "gradP = {}",
        summary.body_force.x
    );

    let mesh = solver.mesh();
    let max_err = mesh
        .cell_centers()
        .iter()
        .zip(solver.state().velocity.internal())
        .map(|(c, u)| {
            let eta = c.y - 1.0;
            (u.x - 1.5 * (1.0 - eta * eta)).abs()
        })
        .fold(0.0, f64::max);
    assert!(max_err < 0.01, "max profile error {}", max_err);

    // 层流线性近壁区 u⁺ ≈ y⁺
    let wall = summary.last_step.unwrap().wall;
    assert!((wall.u_plus - wall.y_plus).abs() < 0.1 * wall.y_plus);
}

#[test]
fn bulk_velocity_is_held_on_graded_mesh() {
    let mesh = ChannelMeshBuilder::new().cells(16).height(2.0).grading(5.0).build().unwrap();
    let turbulence = Box::new(Laminar::new(&mesh, 0.05));
    let mut solver = build(mesh, 0.5, 20, turbulence, memory_recorder());

    while let Some(report) = solver.step().unwrap() {
        let bulk = solver.state().masked_bulk_velocity(solver.mesh());
        assert!((bulk.x - 0.5).abs() < 1e-12, "step {}", report.time_index);
        assert!(bulk.y.abs() < 1e-12 && bulk.z.abs() < 1e-12);
        // 壁面速度始终为零
        assert_eq!(solver.state().velocity.boundary_value(0, 0), DVec3::ZERO);
    }
}

#[test]
fn transverse_initial_body_force_drives_no_crossflow() {
    let mesh = ChannelMeshBuilder::new().cells(10).height(2.0).build().unwrap();
    let turbulence = Box::new(Laminar::new(&mesh, 0.01));
    let state = FlowState::new(&mesh, DVec3::X, DVec3::ZERO, DVec3::new(0.0, 0.0, 0.05)).unwrap();
    let time = TimeControl::new(0.0, 20.0, 1.0, WriteControl::TimeStep, 100.0).unwrap();
    let momentum = Box::new(FvMomentumSystem::new(0.5, SolverConfig::new(1e-12, 1000)));
    let mut solver = SolverLoop::new(mesh, state, time, turbulence, momentum, memory_recorder()).unwrap();

    let summary = solver.run().unwrap();
    assert_eq!(summary.steps, 20);
    assert!((summary.bulk_velocity.x - 1.0).abs() < 1e-12);
    assert!(summary.bulk_velocity.y.abs() < 1e-12);
    assert!(summary.bulk_velocity.z.abs() < 1e-12, "w = {}", summary.bulk_velocity.z);
    assert!(solver.state().velocity.internal().iter().all(|u| u.z.abs() < 1e-12));
}

#[test]
fn mixing_length_channel_runs() {
    let mesh = ChannelMeshBuilder::new().cells(40).height(2.0).grading(10.0).build().unwrap();
    let turbulence = Box::new(MixingLength::new(&mesh, 2e-5, MixingLengthParams::default()));
    let mut solver = build(mesh, 0.1335, 200, turbulence, memory_recorder());

    let summary = solver.run().unwrap();
    let last = summary.last_step.unwrap();
    assert!(last.wall.is_finite());
    assert!(last.wall.friction_velocity > 0.0);
    assert!(last.pressure_gradient.is_finite());
    assert!((summary.bulk_velocity.x - 0.1335).abs() < 1e-12);

    let turbulence = solver.turbulence();
    assert!(turbulence.nut().internal().iter().all(|v| v.is_finite() && *v >= 0.0));
    // 外区涡粘性远大于分子粘度
    let quarter = solver.mesh().n_cells() / 4;
    assert!(turbulence.nut().internal()[quarter] > 10.0 * 2e-5);
}

#[test]
fn half_channel_with_symmetry_plane() {
    let mesh = ChannelMeshBuilder::new()
        .cells(10)
        .height(1.0)
        .half_channel(true)
        .build()
        .unwrap();
    let turbulence = Box::new(Laminar::new(&mesh, 0.01));
    let mut solver = build(mesh, 1.0, 300, turbulence, memory_recorder());
    assert_eq!(solver.geometry().n_wall_faces, 1);

    let summary = solver.run().unwrap();
    // 与全槽道相同的解析体积力
    assert!(((summary.body_force.x - 0.03) / 0.03).abs() < 0.02);
}

#[test]
fn write_steps_produce_files() {
    let dir = tempfile::tempdir().unwrap();
    let mesh = ChannelMeshBuilder::new().cells(8).height(2.0).build().unwrap();
    let turbulence = Box::new(Laminar::new(&mesh, 0.01));
    let recorder = ProfileRecorder::new(
        Box::new(FileGraphWriter::new(dir.path(), GraphFormat::Csv)),
        Box::new(JsonFieldWriter::new(dir.path())),
    );
    let state = FlowState::new(&mesh, DVec3::X, DVec3::ZERO, DVec3::ZERO).unwrap();
    let time = TimeControl::new(0.0, 4.0, 1.0, WriteControl::TimeStep, 2.0).unwrap();
    let momentum = Box::new(FvMomentumSystem::new(0.5, SolverConfig::default()));
    let mut solver = SolverLoop::new(mesh, state, time, turbulence, momentum, recorder).unwrap();

    let summary = solver.run().unwrap();
    assert_eq!(summary.writes, 2);
    for time in ["2", "4"] {
        let time_dir = dir.path().join(time);
        for name in PROFILE_NAMES {
            let path = time_dir.join(format!("{}.csv", name));
            let text = std::fs::read_to_string(&path).unwrap();
            // 表头 + 8 行
            assert_eq!(text.lines().count(), 9, "{}", path.display());
        }
        assert!(time_dir.join("U.json").exists());
        assert!(time_dir.join("R.json").exists());
    }
    assert!(!dir.path().join("1").exists());
}
