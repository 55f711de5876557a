//! # Concurrency Tests using Loom
//!
//! Models the concurrent scheduler's ownership rule with loom: workers only
//! ever hand outcomes over a channel, and a single consumer owns the
//! `RunState`. Also models the stop flag a failing consumer raises to halt
//! dispatching.

#[cfg(test)]
mod tests {
    use better_testing::models::{Outcome, RunState};
    use loom::sync::Arc;
    use loom::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use loom::sync::mpsc;
    use loom::thread;

    const STACK_SIZE: usize = 8 * 1024 * 1024; // 8 MB

    /// Runs a loom model on a thread with a larger stack; loom's exploration
    /// recurses deeply.
    fn run_model<F>(model: F)
    where
        F: Fn() + Sync + Send + 'static,
    {
        let handle = std::thread::Builder::new()
            .name("loom-test-thread".into())
            .stack_size(STACK_SIZE)
            .spawn(move || loom::model(model))
            .unwrap();

        handle.join().unwrap();
    }

    /// Two workers finish in any order; the consumer sees each outcome once
    /// and its counters always end consistent with the total.
    #[test]
    fn test_single_consumer_counts_every_outcome() {
        run_model(|| {
            const NUM_WORKERS: usize = 2;
            let (tx, rx) = mpsc::channel();

            let mut handles = vec![];
            for i in 0..NUM_WORKERS {
                let tx = tx.clone();
                handles.push(thread::spawn(move || {
                    let outcome = if i == 0 {
                        Outcome::pass(format!("case{i}.c"))
                    } else {
                        Outcome::fail(format!("case{i}.c"), "boom")
                    };
                    tx.send(outcome).unwrap();
                }));
            }
            drop(tx);

            let mut state = RunState::new(NUM_WORKERS);
            let mut seen = Vec::new();
            for _ in 0..NUM_WORKERS {
                let outcome = rx.recv().unwrap();
                state.record(&outcome);
                assert!(state.passed + state.failed <= state.total);
                seen.push(outcome.name);
            }

            for handle in handles {
                handle.join().unwrap();
            }

            seen.sort();
            assert_eq!(seen, vec!["case0.c", "case1.c"]);
            assert!(state.is_complete());
            assert_eq!((state.passed, state.failed), (1, 1));
        });
    }

    /// A worker racing the consumer's stop flag either runs its case or
    /// skips it entirely; the flag is always observed as set afterwards.
    #[test]
    fn test_stop_flag_halts_dispatch() {
        run_model(|| {
            let stopped = Arc::new(AtomicBool::new(false));
            let dispatched = Arc::new(AtomicUsize::new(0));

            let worker = {
                let stopped = stopped.clone();
                let dispatched = dispatched.clone();
                thread::spawn(move || {
                    if !stopped.load(Ordering::Acquire) {
                        dispatched.fetch_add(1, Ordering::Relaxed);
                    }
                })
            };

            // The consumer rejects an outcome and stops dispatching.
            stopped.store(true, Ordering::Release);

            worker.join().unwrap();

            assert!(stopped.load(Ordering::Acquire));
            let count = dispatched.load(Ordering::Relaxed);
            assert!(count <= 1, "case dispatched {count} times");
        });
    }
}
