use animbake::{BakeSession, BodySeed, KeyframeSink, SimSettings, TrajectorySample};
use glam::Vec2;

/// Prints every tenth keyframe instead of writing into a document.
struct ConsoleSink;

impl KeyframeSink for ConsoleSink {
    type Error = std::convert::Infallible;

    fn write_sample(
        &mut self,
        body: usize,
        sample: &TrajectorySample,
    ) -> Result<(), Self::Error> {
        if (sample.time * 30.0).round() as usize % 10 == 0 {
            println!(
                "body {body} t={:.2}s pos=({:.1}, {:.1}) sleeping={}",
                sample.time, sample.position.x, sample.position.y, sample.is_sleeping
            );
        }
        Ok(())
    }
}

fn main() {
    let mut settings = SimSettings::default();
    settings.duration = 4.0;
    let mut session = BakeSession::new(settings).expect("valid settings");

    session.add_body(&BodySeed {
        position: Vec2::new(0.0, 0.0),
        width: 100.0,
        height: 100.0,
        ..BodySeed::default()
    });

    session.run().expect("simulation succeeds");
    let written = session.bake_into(&mut ConsoleSink);
    println!("baked {written} bodies");
}
