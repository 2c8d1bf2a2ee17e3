//! Tick-counted deferred callbacks.
//!
//! Tasks are polled once per tick against an elapsed-tick counter, so their
//! granularity is the frame rate. There are no wall-clock timers here.

use bevy::prelude::*;

pub type Task<C> = Box<dyn FnOnce(&mut C) + Send + Sync>;

struct Scheduled<C> {
    due: u64,
    task: Task<C>,
}

/// Queue of callbacks that run against a context `C` after a delay in ticks.
pub struct Scheduler<C> {
    elapsed: u64,
    tasks: Vec<Scheduled<C>>,
}

impl<C> Default for Scheduler<C> {
    fn default() -> Self {
        Self {
            elapsed: 0,
            tasks: Vec::new(),
        }
    }
}

impl<C> Scheduler<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` once `delay` more ticks have elapsed.
    ///
    /// A delay of zero fires on the next tick.
    pub fn do_later(&mut self, delay: u32, task: impl FnOnce(&mut C) + Send + Sync + 'static) {
        let due = self.elapsed + u64::from(delay.max(1));
        self.tasks.push(Scheduled {
            due,
            task: Box::new(task),
        });
    }

    /// Advance one tick and take every task now due, in scheduling order.
    pub fn advance(&mut self) -> Vec<Task<C>> {
        self.elapsed += 1;
        let now = self.elapsed;

        let (due, pending): (Vec<_>, Vec<_>) = self.tasks.drain(..).partition(|s| s.due <= now);
        self.tasks = pending;
        due.into_iter().map(|s| s.task).collect()
    }

    /// Advance one tick and run the due tasks against `ctx`. Returns how many fired.
    pub fn tick(&mut self, ctx: &mut C) -> usize {
        let due = self.advance();
        let fired = due.len();
        for task in due {
            task(ctx);
        }
        fired
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

/// Deferred tasks that need the whole world, e.g. reloading the scene.
#[derive(Resource, Default)]
pub struct DeferredTasks(pub Scheduler<World>);

impl DeferredTasks {
    pub fn do_later(&mut self, delay: u32, task: impl FnOnce(&mut World) + Send + Sync + 'static) {
        self.0.do_later(delay, task);
    }
}

/// Exclusive system: advance the world scheduler and run what is due.
///
/// Due tasks are taken out first so a task can schedule more work.
pub fn run_deferred_tasks(world: &mut World) {
    let due = world.resource_mut::<DeferredTasks>().0.advance();
    for task in due {
        task(world);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_exact_delay() {
        let mut scheduler: Scheduler<Vec<&'static str>> = Scheduler::new();
        let mut log = Vec::new();

        scheduler.do_later(3, |log| log.push("blink off"));

        assert_eq!(scheduler.tick(&mut log), 0);
        assert_eq!(scheduler.tick(&mut log), 0);
        assert!(log.is_empty());
        assert_eq!(scheduler.tick(&mut log), 1);
        assert_eq!(log, vec!["blink off"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_same_tick_runs_in_schedule_order() {
        let mut scheduler: Scheduler<Vec<u32>> = Scheduler::new();
        let mut log = Vec::new();

        scheduler.do_later(2, |log| log.push(1));
        scheduler.do_later(1, |log| log.push(0));
        scheduler.do_later(2, |log| log.push(2));

        scheduler.tick(&mut log);
        scheduler.tick(&mut log);
        assert_eq!(log, vec![0, 1, 2]);
    }

    #[test]
    fn test_zero_delay_fires_next_tick() {
        let mut scheduler: Scheduler<u32> = Scheduler::new();
        let mut count = 0;
        scheduler.do_later(0, |c| *c += 1);
        assert_eq!(scheduler.pending(), 1);
        scheduler.tick(&mut count);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_world_tasks_can_reschedule() {
        #[derive(Resource, Default)]
        struct Counter(u32);

        let mut world = World::new();
        world.init_resource::<Counter>();
        world.init_resource::<DeferredTasks>();

        world.resource_mut::<DeferredTasks>().do_later(1, |world| {
            world.resource_mut::<Counter>().0 += 1;
            world
                .resource_mut::<DeferredTasks>()
                .do_later(1, |world| world.resource_mut::<Counter>().0 += 10);
        });

        run_deferred_tasks(&mut world);
        assert_eq!(world.resource::<Counter>().0, 1);
        run_deferred_tasks(&mut world);
        assert_eq!(world.resource::<Counter>().0, 11);
        assert_eq!(world.resource::<DeferredTasks>().0.pending(), 0);
    }
}
