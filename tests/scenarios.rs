//! End-to-end scenarios: producer thread, queue, control loop and machines.

use fsmloop::core::{Event, Signal, StateId, Tick};
use fsmloop::hsm::{Behavior, Hsm, Outcome, Trigger};
use fsmloop::queue::BoundedQueue;
use fsmloop::runtime::{ControlLoop, Decoded, LoopConfig, RecoveryPolicy};
use fsmloop::state_enum;
use fsmloop::table::{TableBuilder, TableMachine};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn blocking_dequeue_returns_items_in_order_then_blocks() {
    let queue = Arc::new(BoundedQueue::new(10).unwrap());
    for item in ['A', 'B', 'C'] {
        queue.enqueue(item).unwrap();
    }

    assert_eq!(queue.dequeue_blocking(), 'A');
    assert_eq!(queue.dequeue_blocking(), 'B');
    assert_eq!(queue.dequeue_blocking(), 'C');

    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || queue.dequeue_blocking())
    };
    thread::sleep(Duration::from_millis(50));
    assert!(!consumer.is_finished());

    queue.enqueue('D').unwrap();
    assert_eq!(consumer.join().unwrap(), 'D');
}

#[test]
fn timed_dequeue_on_empty_queue_times_out() {
    let queue = BoundedQueue::<char>::new(10).unwrap();
    let start = Instant::now();

    assert_eq!(queue.dequeue_timeout(Duration::from_millis(100)), None);
    assert!(start.elapsed() >= Duration::from_millis(100));
    assert!(queue.is_empty());
}

#[test]
fn flat_machine_two_states_four_signals() {
    let table = TableBuilder::<(), ()>::new(2, 4)
        .initial(|me| me.transition(StateId(0)))
        .on(StateId(0), Signal(2), |me, _| me.transition(StateId(1)))
        .build()
        .unwrap();
    let mut machine = TableMachine::new(Arc::new(table), ());
    machine.init().unwrap();

    machine.dispatch(&Event::new(Signal(2))).unwrap();
    assert_eq!(machine.current(), StateId(1));

    machine.dispatch(&Event::new(Signal(2))).unwrap();
    assert_eq!(machine.current(), StateId(1));
}

/// Records the sub-count of every tick it receives.
fn tick_recorder() -> TableMachine<Vec<u8>, Tick> {
    let table = TableBuilder::<Vec<u8>, Tick>::new(1, 1)
        .initial(|me| me.transition(StateId(0)))
        .on(StateId(0), Signal(0), |me, event| {
            if let Some(tick) = event.payload() {
                me.data.push(tick.sub_count);
            }
        })
        .build()
        .unwrap();
    TableMachine::new(Arc::new(table), Vec::new())
}

#[test]
fn idle_loop_ticks_ten_times_per_second() {
    let queue = Arc::new(BoundedQueue::new(10).unwrap());
    let handle = ControlLoop::builder(Arc::clone(&queue), tick_recorder())
        .config(LoopConfig::default())
        .tick_signal(Signal(0))
        .decoder(|_: ()| Decoded::Exit)
        .build()
        .unwrap()
        .spawn()
        .unwrap();

    thread::sleep(Duration::from_millis(1050));
    queue.enqueue(()).unwrap();
    let report = handle.join().unwrap().unwrap();

    // Every wait lasts at least 100 ms, so at most ten ticks fit; allow a
    // little slack for a loaded scheduler on the lower side.
    let ticks = report.dispatcher.data().clone();
    assert!(ticks.len() <= 10, "too many ticks: {ticks:?}");
    assert!(ticks.len() >= 8, "too few ticks: {ticks:?}");
    let expected: Vec<u8> = (0..ticks.len() as u8).collect();
    assert_eq!(ticks, expected);
    assert_eq!(report.stats.ticks, ticks.len() as u64);
}

#[test]
fn producer_full_queue_drops_newest_input() {
    let queue = Arc::new(BoundedQueue::new(2).unwrap());
    assert!(queue.enqueue(1).is_ok());
    assert!(queue.enqueue(2).is_ok());

    let rejected = queue.enqueue(3).unwrap_err().into_inner();
    assert_eq!(rejected, 3);
    assert_eq!(queue.dequeue_blocking(), 1);
    assert_eq!(queue.dequeue_blocking(), 2);
}

state_enum! {
    enum Bomb {
        Setting,
        Timing,
    }
}

const UP: Signal = Signal(4);
const ARM: Signal = Signal(6);
const TICK: Signal = Signal(7);

#[derive(Clone, Debug, PartialEq)]
enum Payload {
    Tick(Tick),
}

impl From<Tick> for Payload {
    fn from(tick: Tick) -> Self {
        Self::Tick(tick)
    }
}

#[derive(Default)]
struct Countdown {
    timeout: u8,
    journal: Vec<String>,
    resync: bool,
    sub_counts: Vec<u8>,
}

impl Behavior for Countdown {
    type State = Bomb;
    type Payload = Payload;

    fn initial(&mut self) -> Outcome<Bomb> {
        self.timeout = 2;
        Outcome::Transition(Bomb::Setting)
    }

    fn handle(&mut self, state: &Bomb, trigger: Trigger<'_, Payload>) -> Outcome<Bomb> {
        match (state, trigger) {
            (Bomb::Timing, Trigger::Entry) => {
                self.resync = true;
                self.journal.push("timing entry".into());
                Outcome::Handled
            }
            (_, Trigger::Entry) | (_, Trigger::Exit) => Outcome::Handled,
            (Bomb::Setting, Trigger::Event(e)) if e.signal == UP => {
                self.timeout += 1;
                Outcome::Handled
            }
            (Bomb::Setting, Trigger::Event(e)) if e.signal == ARM => {
                Outcome::Transition(Bomb::Timing)
            }
            (Bomb::Timing, Trigger::Event(e)) if e.signal == TICK => {
                let Some(Payload::Tick(tick)) = e.payload() else {
                    return Outcome::Ignored;
                };
                self.sub_counts.push(tick.sub_count);
                if tick.sub_count == 0 {
                    self.timeout -= 1;
                }
                if self.timeout == 0 {
                    self.journal.push("boom".into());
                    self.timeout = 2;
                    return Outcome::Transition(Bomb::Setting);
                }
                Outcome::Handled
            }
            _ => Outcome::Ignored,
        }
    }

    fn take_tick_resync(&mut self) -> bool {
        std::mem::take(&mut self.resync)
    }
}

#[test]
fn hsm_countdown_runs_through_control_loop() {
    let config = LoopConfig {
        tick_interval: Duration::from_millis(5),
        tick_base: 3,
        recovery: RecoveryPolicy::LogAndContinue,
        ..LoopConfig::default()
    };
    let queue = Arc::new(config.queue::<char>().unwrap());
    let handle = ControlLoop::builder(Arc::clone(&queue), Hsm::new(Countdown::default()))
        .config(config)
        .name("countdown")
        .tick_signal(TICK)
        .decoder(|key| match key {
            'u' => Decoded::Dispatch(Event::new(UP)),
            'a' => Decoded::Dispatch(Event::new(ARM)),
            '\u{1b}' => Decoded::Exit,
            _ => Decoded::Discard,
        })
        .build()
        .unwrap()
        .spawn()
        .unwrap();

    queue.enqueue('u').unwrap();
    queue.enqueue('a').unwrap();

    // Timeout 3 at base 3: the seventh tick (third sub-count 0) explodes.
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        thread::sleep(Duration::from_millis(20));
        if queue.is_empty() {
            break;
        }
    }
    thread::sleep(Duration::from_millis(300));
    queue.enqueue('\u{1b}').unwrap();

    let report = handle.join().unwrap().unwrap();
    let machine = report.dispatcher;
    let countdown = machine.behavior();

    assert!(countdown.journal.contains(&"boom".to_string()));
    assert_eq!(machine.current(), Some(&Bomb::Setting));
    // Entering Timing resyncs the counter, so its first tick carries 0.
    assert_eq!(countdown.sub_counts, [0, 1, 2, 0, 1, 2, 0]);
    assert_eq!(machine.history().get_path(), vec![&Bomb::Setting, &Bomb::Timing, &Bomb::Setting]);
}
