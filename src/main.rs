use std::{
    cell::RefCell,
    rc::Rc,
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

use chrono::Local;
use fern::Dispatch;
use log::warn;
use mech_sim::{
    MechanismConfig, MechanismController, MechanismPhysics, PidGains, PidMechanismController,
    Pose, SimulatedMotor, SimulatedPotentiometer, ui,
};

const TICK: Duration = Duration::from_millis(20);
const STALL_DEADLINE: Duration = Duration::from_secs(8);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MechanismId {
    Lift,
    FourBar,
    MobileGoal,
}

pub enum OperatorCommand {
    MoveTo(MechanismId, i32),
    Quit,
}

/// One mechanism with its simulated sensor, motor and plant, plus the
/// stall-deadline bookkeeping the supervising loop applies on top of the
/// control core.
struct MechanismRig {
    id: MechanismId,
    sensor: Rc<RefCell<SimulatedPotentiometer>>,
    motor: Rc<RefCell<SimulatedMotor>>,
    controller: PidMechanismController<'static>,
    physics: MechanismPhysics,
    // An inverted controller matches a motor wired backwards, so the plant
    // has to see the flipped sign too.
    wiring_flipped: bool,
    goal_since: Option<Instant>,
    stall_warned: bool,
}

impl MechanismRig {
    fn new(id: MechanismId, config: MechanismConfig, start_position: i32, max_speed: f64) -> Self {
        let sensor = Rc::new(RefCell::new(SimulatedPotentiometer::new(start_position)));
        let motor = Rc::new(RefCell::new(SimulatedMotor::new()));

        let controller =
            PidMechanismController::new(config, Rc::clone(&sensor), Rc::clone(&motor));
        let physics = MechanismPhysics::new(
            start_position as f64,
            config.travel_min as f64,
            config.travel_max as f64,
            max_speed,
        );

        MechanismRig {
            id,
            sensor,
            motor,
            controller,
            physics,
            wiring_flipped: config.inverted,
            goal_since: None,
            stall_warned: false,
        }
    }

    fn move_to(&mut self, target: i32) {
        self.controller.move_to(target);
        self.goal_since = Some(Instant::now());
        self.stall_warned = false;
    }

    fn tick(&mut self, dt_secs: f64) {
        self.controller.tick();

        let command = self.motor.borrow().get_command();
        self.physics
            .set_command(if self.wiring_flipped { -command } else { command });
        self.physics.update(dt_secs);
        self.sensor.borrow_mut().set_raw(self.physics.raw_position());

        if let Some(since) = self.goal_since {
            if self.controller.is_running() && !self.stall_warned && since.elapsed() > STALL_DEADLINE
            {
                warn!(
                    "{}: still approaching {} after {:?}, possible stall",
                    self.controller.name(),
                    self.controller.goal(),
                    STALL_DEADLINE
                );
                self.stall_warned = true;
            }
        }
    }
}

fn setup_logger() -> Result<(), Box<dyn std::error::Error>> {
    Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::fs::File::create("temp.log")?)
        .apply()?;

    Ok(())
}

fn main() {
    setup_logger().expect("failed");

    println!("mech-sim.");

    let mut rigs = vec![
        MechanismRig::new(
            MechanismId::Lift,
            MechanismConfig {
                name: "lift",
                gains: PidGains::new(0.6, 0.02, 0.1),
                threshold: 10,
                travel_min: 0,
                travel_max: 2200,
                max_step: 20,
                inverted: false,
            },
            0,
            900.0,
        ),
        MechanismRig::new(
            MechanismId::FourBar,
            MechanismConfig {
                name: "four-bar",
                gains: PidGains::new(0.8, 0.0, 0.2),
                threshold: 15,
                travel_min: 200,
                travel_max: 1400,
                max_step: 15,
                inverted: true,
            },
            200,
            600.0,
        ),
        MechanismRig::new(
            MechanismId::MobileGoal,
            MechanismConfig {
                name: "mobile-goal",
                gains: PidGains::new(0.5, 0.05, 0.0),
                threshold: 20,
                travel_min: 0,
                travel_max: 3000,
                max_step: 25,
                inverted: false,
            },
            0,
            1200.0,
        ),
    ];

    // Odometry is out of scope here; the pose is display-only.
    let pose = Pose::default();

    // Goal commands cross from the operator side into this loop over a
    // channel, so all controller state stays single-writer.
    let (command_tx, command_rx) = mpsc::channel::<OperatorCommand>();

    let _ = command_tx.send(OperatorCommand::MoveTo(MechanismId::Lift, 1800));
    let _ = command_tx.send(OperatorCommand::MoveTo(MechanismId::FourBar, 900));
    // Beyond MoGoMAX on purpose; the controller clamps it to 3000.
    let _ = command_tx.send(OperatorCommand::MoveTo(MechanismId::MobileGoal, 4000));
    let _ = command_tx.send(OperatorCommand::MoveTo(MechanismId::Lift, 400));
    drop(command_tx);

    let dt_secs = TICK.as_secs_f64();
    let mut commands_exhausted = false;
    let mut tick_count: u64 = 0;

    loop {
        // Process operator input (non-blocking), one command per tick.
        match command_rx.try_recv() {
            Ok(OperatorCommand::MoveTo(id, target)) => {
                if let Some(rig) = rigs.iter_mut().find(|rig| rig.id == id) {
                    println!("operator command: {:?} -> {}", id, target);
                    rig.move_to(target);
                }
            }
            Ok(OperatorCommand::Quit) => {
                println!("shutdown");
                break;
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                commands_exhausted = true;
            }
            Err(mpsc::TryRecvError::Empty) => {}
        }

        for rig in rigs.iter_mut() {
            rig.tick(dt_secs);
        }

        tick_count += 1;

        if tick_count % 10 == 0 {
            let statuses: Vec<_> = rigs.iter().map(|rig| ui::snapshot(&rig.controller)).collect();
            ui::log_to_terminal(tick_count, &statuses, &pose);
        }

        if commands_exhausted && rigs.iter().all(|rig| rig.controller.at_goal()) {
            println!("all mechanisms holding, done after {} ticks", tick_count);
            break;
        }

        thread::sleep(TICK);
    }
}
