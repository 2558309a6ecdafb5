use animbake::{BodyKind, BodySeed, JointKind, JointSpec, SimSettings, Simulation};
use glam::Vec2;

fn main() {
    let mut settings = SimSettings::default();
    settings.duration = 3.0;
    settings.floor_y = 900.0;
    let mut sim = Simulation::new(settings).expect("valid settings");

    // A fixed anchor with a chain of four links swinging below it.
    let mut anchor = BodySeed {
        position: Vec2::new(400.0, 100.0),
        width: 20.0,
        height: 20.0,
        ..BodySeed::default()
    };
    anchor.kind = BodyKind::Static;
    let mut previous = sim.add_body(anchor.build(sim.settings()));

    for i in 1..=4 {
        let link = BodySeed {
            position: Vec2::new(400.0 + i as f32 * 40.0, 100.0),
            width: 20.0,
            height: 20.0,
            ..BodySeed::default()
        };
        let index = sim.add_body(link.build(sim.settings()));
        let mut spec = JointSpec::new(previous, index, JointKind::Distance);
        spec.stiffness = Some(0.9);
        sim.add_joint(&spec).expect("valid joint");
        previous = index;
    }

    sim.run().expect("simulation succeeds");

    for (index, trajectory) in sim.trajectories().iter().enumerate() {
        let last = trajectory.last().expect("at least one frame");
        println!(
            "body {index}: final pos=({:.1}, {:.1}) sleeping={}",
            last.position.x, last.position.y, last.is_sleeping
        );
    }
}
