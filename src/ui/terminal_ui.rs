use crate::control::mechanism::{MechanismController, PidMechanismController};
use crate::core::pose::Pose;

pub struct MechanismStatus {
    pub name: &'static str,
    pub position: i32,
    pub goal: i32,
    pub error: i32,
    pub command: i32,
    pub running: bool,
}

pub fn snapshot(controller: &PidMechanismController) -> MechanismStatus {
    MechanismStatus {
        name: controller.name(),
        position: controller.current_position(),
        goal: controller.goal(),
        error: controller.error(),
        command: controller.last_command(),
        running: controller.is_running(),
    }
}

pub fn log_to_terminal(tick: u64, statuses: &[MechanismStatus], pose: &Pose) {
    print!("\x1B[2J\x1B[1;1H");

    println!("--- Mechanism Control (tick {}) ---", tick);
    for status in statuses {
        println!(
            "{:<12} pos: {:>5}  goal: {:>5}  err: {:>5}  cmd: {:>4}  {}",
            status.name,
            status.position,
            status.goal,
            status.error,
            status.command,
            if status.running { "RUNNING" } else { "HOLDING" }
        );
    }

    println!("\n--- Field Pose ---");
    println!(
        "X: {:.1}  Y: {:.1}  Heading: {:.1} deg",
        pose.x, pose.y, pose.heading_deg
    );
    println!("----------------------\n");
}
