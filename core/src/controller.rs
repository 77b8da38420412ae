use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell as Shared;
use core::time::Duration;

use crate::*;

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock(Rc<Shared<Duration>>);

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.0.set(self.0.get() + by);
    }

    pub fn set(&self, now: Duration) {
        self.0.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.0.get()
    }
}

/// What just happened, delivered to subscribers together with the new snapshot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GameEvent {
    Started(RoundId),
    Revealed {
        index: CellIndex,
        outcome: RevealOutcome,
    },
    CashOutRequested(Money),
    Settled(SettleOutcome),
    LevelChanged(Level),
    BetChanged(Money),
    Reset,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Snapshot<'a> {
    pub state: &'a GameState,
    pub reveal_all: bool,
}

pub type Subscriber = Box<dyn FnMut(&GameEvent, Snapshot<'_>)>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct ScheduledTransition {
    round: RoundId,
    due: Duration,
}

/// Drives a [`RoundEngine`] for a front-end: forwards intents, notifies subscribers of every
/// change and delivers deferred transitions once their delay has passed on `clock`.
///
/// Rejected intents are logged and otherwise ignored; the methods return whether anything changed.
pub struct SessionController<C, G = RandomBoardGenerator> {
    engine: RoundEngine<G>,
    clock: C,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: usize,
    timers: Vec<ScheduledTransition>,
}

impl<C: Clock, G: BoardGenerator> SessionController<C, G> {
    pub fn new(engine: RoundEngine<G>, clock: C) -> Self {
        Self {
            engine,
            clock,
            subscribers: Vec::new(),
            next_subscription: 0,
            timers: Vec::new(),
        }
    }

    pub fn engine(&self) -> &RoundEngine<G> {
        &self.engine
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            state: self.engine.state(),
            reveal_all: self.engine.reveal_all(),
        }
    }

    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&GameEvent, Snapshot<'_>) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(other, _)| *other != id);
        self.subscribers.len() != before
    }

    pub fn start(&mut self) -> bool {
        let result = self.engine.start();
        self.apply("start", result, GameEvent::Started)
    }

    pub fn reveal_cell(&mut self, index: CellIndex) -> bool {
        match self.engine.reveal_cell(index) {
            Ok(outcome) if !outcome.has_update() => false,
            result => self.apply("reveal", result, |outcome| GameEvent::Revealed {
                index,
                outcome,
            }),
        }
    }

    pub fn cash_out(&mut self) -> bool {
        let payout = self.engine.state().potential_payout();
        let result = self.engine.cash_out();
        self.apply("cash out", result, |_| GameEvent::CashOutRequested(payout))
    }

    pub fn change_level(&mut self, level: Level) -> bool {
        let result = self.engine.change_level(level);
        self.apply("change level", result, |_| GameEvent::LevelChanged(level))
    }

    pub fn change_bet(&mut self, amount: Money) -> bool {
        let result = self.engine.change_bet(amount);
        self.apply("change bet", result, |_| GameEvent::BetChanged(amount))
    }

    pub fn adjust_bet(&mut self, increment: bool) -> bool {
        let result = self.engine.adjust_bet(increment);
        self.apply("adjust bet", result, GameEvent::BetChanged)
    }

    pub fn reset(&mut self) {
        self.engine.reset();
        self.apply("reset", Ok(()), |_| GameEvent::Reset);
    }

    /// Fires every deferred transition whose deadline has passed, returning how many applied.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let (due, waiting): (Vec<_>, Vec<_>) = core::mem::take(&mut self.timers)
            .into_iter()
            .partition(|timer| timer.due <= now);
        self.timers = waiting;

        let mut fired = 0;
        for timer in due {
            match self.engine.fire(timer.round) {
                Ok(outcome) => {
                    fired += 1;
                    self.notify(&GameEvent::Settled(outcome));
                }
                Err(err) => log::debug!("dropped transition for round {}: {}", timer.round, err),
            }
        }
        fired
    }

    /// Clock time at which the next deferred transition is due.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.iter().map(|timer| timer.due).min()
    }

    /// How long until [`tick`](Self::tick) has something to do.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.next_deadline()
            .map(|due| due.saturating_sub(self.clock.now()))
    }

    fn apply<T>(
        &mut self,
        intent: &str,
        result: Result<T>,
        event: impl FnOnce(T) -> GameEvent,
    ) -> bool {
        match result {
            Ok(value) => {
                let event = event(value);
                self.sync_timers();
                self.notify(&event);
                true
            }
            Err(err) => {
                log::debug!("{} rejected: {}", intent, err);
                false
            }
        }
    }

    /// Drops timers of superseded rounds and schedules the engine's pending transition.
    fn sync_timers(&mut self) {
        let round = self.engine.round();
        self.timers.retain(|timer| timer.round == round);

        if let Some(pending) = self.engine.pending_transition()
            && !self.timers.iter().any(|timer| timer.round == pending.round)
        {
            self.timers.push(ScheduledTransition {
                round: pending.round,
                due: self.clock.now() + pending.delay,
            });
        }
    }

    fn notify(&mut self, event: &GameEvent) {
        log::trace!("notify {:?}", event);
        let snapshot = Snapshot {
            state: self.engine.state(),
            reveal_all: self.engine.reveal_all(),
        };
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(event, snapshot);
        }
    }
}
