//! Time Bomb
//!
//! This example wires both dispatcher flavors to a keyboard-style producer:
//! - `table`: flat state table, setup done inside the transition handler
//! - `hsm`: enum states with entry/exit hooks
//!
//! Type `u`, `d` or `a` followed by Enter to adjust the timeout, arm, or
//! enter the disarm code (up = 1, down = 0; the code is `uudu`). `q` quits.
//!
//! Run with: cargo run --example bomb -- hsm
//! Set RUST_LOG=fsmloop=debug to watch transitions.

use fsmloop::core::{Event, Signal, State, StateId, Tick};
use fsmloop::hsm::{Behavior, Hsm, Outcome, Trigger};
use fsmloop::queue::BoundedQueue;
use fsmloop::runtime::{ControlLoop, Decoded, Dispatcher, LoopConfig, LoopStats};
use fsmloop::state_enum;
use fsmloop::table::{Instance, TableBuilder, TableMachine};
use std::io::BufRead;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const TIMEOUT_INIT: u8 = 15;
const TIMEOUT_MIN: u8 = 10;
const TIMEOUT_MAX: u8 = 120;
const PASSWORD: u8 = 0xD;

const UP: Signal = Signal(0);
const DOWN: Signal = Signal(1);
const ARM: Signal = Signal(2);
const TICK: Signal = Signal(3);

#[derive(Debug, Default)]
struct Bomb {
    timeout: u8,
    code: u8,
}

impl Bomb {
    fn raise(&mut self) {
        if self.timeout < TIMEOUT_MAX {
            self.timeout += 1;
        }
        println!("timeout[{}]", self.timeout);
    }

    fn lower(&mut self) {
        if self.timeout > TIMEOUT_MIN {
            self.timeout -= 1;
        }
        println!("timeout[{}]", self.timeout);
    }

    fn push_code(&mut self, bit: u8) {
        self.code = (self.code << 1) | bit;
    }

    /// Returns true when the bomb went off.
    fn count_down(&mut self, tick: Tick) -> bool {
        if tick.sub_count == 0 {
            self.timeout = self.timeout.saturating_sub(1);
            println!("timeout[{}]", self.timeout);
        }
        if self.timeout == 0 {
            println!("Boom! Resetting for another round");
            self.timeout = TIMEOUT_INIT;
            return true;
        }
        false
    }
}

fn decode(key: char) -> Decoded<Tick> {
    match key {
        'u' => Decoded::Dispatch(Event::new(UP)),
        'd' => Decoded::Dispatch(Event::new(DOWN)),
        'a' => Decoded::Dispatch(Event::new(ARM)),
        'q' => Decoded::Exit,
        _ => Decoded::Discard,
    }
}

const SETTING: StateId = StateId(0);
const TIMING: StateId = StateId(1);

fn table_bomb() -> TableMachine<Bomb, Tick> {
    let table = TableBuilder::new(2, 4)
        .initial(|me: &mut Instance<Bomb>| {
            me.data.timeout = TIMEOUT_INIT;
            me.transition(SETTING);
        })
        .on(SETTING, UP, |me, _| me.data.raise())
        .on(SETTING, DOWN, |me, _| me.data.lower())
        .on(SETTING, ARM, |me, _| {
            println!("Armed, timeout[{}]", me.data.timeout);
            me.data.code = 0;
            me.resync_ticks();
            me.transition(TIMING);
        })
        .on(TIMING, UP, |me, _| me.data.push_code(1))
        .on(TIMING, DOWN, |me, _| me.data.push_code(0))
        .on(TIMING, ARM, |me, _| {
            if me.data.code == PASSWORD {
                println!("Disarmed");
                me.transition(SETTING);
            } else {
                println!("Wrong code 0x{:02x}", me.data.code);
                me.data.code = 0;
            }
        })
        .on(TIMING, TICK, |me, event: &Event<Tick>| {
            if let Some(tick) = event.payload() {
                if me.data.count_down(*tick) {
                    me.transition(SETTING);
                }
            }
        })
        .build()
        .expect("bomb table is well formed");
    TableMachine::new(Arc::new(table), Bomb::default())
}

state_enum! {
    enum Mode {
        Setting,
        Timing,
    }
}

#[derive(Default)]
struct HsmBomb {
    bomb: Bomb,
    resync: bool,
}

impl Behavior for HsmBomb {
    type State = Mode;
    type Payload = Tick;

    fn initial(&mut self) -> Outcome<Mode> {
        self.bomb.timeout = TIMEOUT_INIT;
        Outcome::Transition(Mode::Setting)
    }

    fn handle(&mut self, state: &Mode, trigger: Trigger<'_, Tick>) -> Outcome<Mode> {
        let event = match trigger {
            Trigger::Entry => {
                println!("{} entry", state.name().to_lowercase());
                if *state == Mode::Timing {
                    self.bomb.code = 0;
                    self.resync = true;
                }
                return Outcome::Handled;
            }
            Trigger::Exit => {
                println!("{} exit", state.name().to_lowercase());
                return Outcome::Handled;
            }
            Trigger::Event(event) => event,
        };

        match (state, event.signal) {
            (Mode::Setting, UP) => self.bomb.raise(),
            (Mode::Setting, DOWN) => self.bomb.lower(),
            (Mode::Setting, ARM) => return Outcome::Transition(Mode::Timing),
            (Mode::Timing, UP) => self.bomb.push_code(1),
            (Mode::Timing, DOWN) => self.bomb.push_code(0),
            (Mode::Timing, ARM) if self.bomb.code == PASSWORD => {
                println!("Disarmed");
                return Outcome::Transition(Mode::Setting);
            }
            (Mode::Timing, TICK) => {
                let exploded = event
                    .payload()
                    .is_some_and(|tick| self.bomb.count_down(*tick));
                if exploded {
                    return Outcome::Transition(Mode::Setting);
                }
            }
            _ => return Outcome::Ignored,
        }
        Outcome::Handled
    }

    fn take_tick_resync(&mut self) -> bool {
        std::mem::take(&mut self.resync)
    }
}

/// Waits for the loop thread and reduces its result to the counters.
type Consumer = Box<dyn FnOnce() -> Result<LoopStats, String>>;

fn start<D>(
    queue: &Arc<BoundedQueue<char>>,
    config: LoopConfig,
    name: &str,
    dispatcher: D,
) -> std::io::Result<Consumer>
where
    D: Dispatcher<Payload = Tick> + Send + 'static,
{
    let handle = ControlLoop::builder(Arc::clone(queue), dispatcher)
        .config(config)
        .name(name)
        .tick_signal(TICK)
        .decoder(decode)
        .build()
        .expect("loop configuration is valid")
        .spawn()?;

    Ok(Box::new(move || match handle.join() {
        Ok(result) => result
            .map(|report| report.stats)
            .map_err(|err| err.to_string()),
        Err(_) => Err("control loop panicked".to_string()),
    }))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let variant = std::env::args().nth(1).unwrap_or_else(|| "hsm".to_string());
    let config = LoopConfig::default();
    let queue = Arc::new(config.queue::<char>().expect("default capacity is non-zero"));

    println!("=== Time Bomb ({variant}) ===");
    println!("u/d adjust, a arms; while armed u=1 d=0 then a to disarm. q quits.\n");

    let consumer = match variant.as_str() {
        "table" => start(&queue, config, "bomb-table", table_bomb()),
        _ => start(&queue, config, "bomb-hsm", Hsm::new(HsmBomb::default())),
    }
    .expect("failed to spawn control loop");

    let mut quit = false;
    for line in std::io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        for key in line.chars() {
            if let Err(full) = queue.enqueue(key) {
                println!("Input dropped: {full}");
                continue;
            }
            if key == 'q' {
                quit = true;
                break;
            }
        }
        if quit {
            break;
        }
    }
    // Stdin closed before a quit key made it into the queue.
    while !quit {
        quit = queue.enqueue('q').is_ok();
        if !quit {
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
    }

    match consumer() {
        Ok(stats) => println!("\nLoop stats: {stats:?}"),
        Err(err) => println!("\nLoop stopped: {err}"),
    }
    println!("=== Example Complete ===");
}
