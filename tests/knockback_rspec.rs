//! Behaviour tests for knockback bounding using rust-rspec.
//!
//! A hit entity must stay on the span of the foothold it stood on until the
//! knockback expires.

use ledge::MotionController;
use test_utils::{flat, standing_on};

const DT: f64 = 1.0 / 60.0;

#[derive(Clone, Debug)]
struct HitWorld {
    ctrl: MotionController,
    xs_during_knockback: Vec<f64>,
    elapsed: f64,
}

impl Default for HitWorld {
    fn default() -> Self {
        Self {
            ctrl: standing_on(&flat(1, 0.0, 100.0, 0.0), 50.0),
            xs_during_knockback: Vec::new(),
            elapsed: 0.0,
        }
    }
}

impl HitWorld {
    fn tick_for(&mut self, seconds: f64) {
        while self.elapsed < seconds {
            self.ctrl.update(DT);
            self.elapsed += DT;
            if self.ctrl.is_in_knockback() {
                self.xs_during_knockback.push(self.ctrl.position().x);
            }
        }
    }
}

#[test]
fn knockback_stays_on_the_foothold_span() {
    rspec::run(&rspec::given(
        "an entity standing mid-way along a foothold spanning x 0..100",
        HitWorld::default(),
        |ctx| {
            ctx.when("it takes a hard hit to the left", |ctx| {
                ctx.before_each(|world| world.ctrl.impact(-500.0, 0.0));

                ctx.then("it enters knockback bounded by the foothold", |world| {
                    assert!(world.ctrl.is_in_knockback());
                    assert_eq!(world.ctrl.knockback_range(), Some((0.0, 100.0)));
                });

                ctx.when("the simulation runs for 0.6 seconds", |ctx| {
                    ctx.before_each(|world| world.tick_for(0.6));

                    ctx.then("x never leaves the span while knocked back", |world| {
                        assert!(!world.xs_during_knockback.is_empty());
                        for x in &world.xs_during_knockback {
                            assert!((0.0..=100.0).contains(x), "x = {x} left the span");
                        }
                    });

                    ctx.then("the knockback has cleared", |world| {
                        assert!(!world.ctrl.is_in_knockback());
                    });

                    ctx.then("it was stopped at the left edge", |world| {
                        assert_eq!(world.ctrl.position().x, 0.0);
                        assert_eq!(world.ctrl.velocity().x, 0.0);
                    });
                });
            });

            ctx.when("two queued hits land before the next update", |ctx| {
                ctx.before_each(|world| {
                    world.ctrl.set_impact_next(-300.0, 0.0);
                    world.ctrl.set_impact_next(-300.0, 0.0);
                    world.tick_for(DT);
                });

                ctx.then("the impulse is not doubled", |world| {
                    assert_eq!(world.ctrl.velocity().x, -300.0);
                    assert!(world.ctrl.is_in_knockback());
                });
            });
        },
    ));
}
