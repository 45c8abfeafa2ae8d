//! End-to-end scenarios driving a headless `Dispatcher` with an
//! in-process event channel and a `RecordingSurface`.

use std::sync::{Arc, Mutex};

use keystage::core::render::DrawCommand;
use keystage::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Screen {
    Init,
    Clicked,
}

const NORMAL: Sprite = Sprite::new(TextureHandle(1), 100, 40);
const HOVERED: Sprite = Sprite::new(TextureHandle(2), 100, 40);
const PRESSED: Sprite = Sprite::new(TextureHandle(3), 100, 40);

//=== Helpers =============================================================

struct Harness {
    scenes: SceneRegistry<Screen>,
    injector: EventInjector,
    dispatcher: Dispatcher<Screen, RecordingSurface>,
}

fn harness(channel: usize) -> Harness {
    let (injector, source) = event_channel(channel);
    let bus = Arc::new(MessageBus::new());
    let scenes = SceneRegistry::new(bus, injector.clone());

    scenes.add_scene(Screen::Init, "Init").unwrap();
    scenes.add_scene(Screen::Clicked, "Clicked").unwrap();
    scenes.define_bidirectional(Screen::Init, Screen::Clicked).unwrap();

    let dispatcher = Dispatcher::new(scenes.clone(), source, RecordingSurface::new());
    Harness { scenes, injector, dispatcher }
}

fn input(event: InputEvent) -> Event {
    Event::Input(event)
}

fn left(down: bool) -> InputEvent {
    let button = MouseButton::Left;
    let modifiers = Modifiers::NONE;
    if down {
        InputEvent::MouseButtonDown { button, modifiers }
    } else {
        InputEvent::MouseButtonUp { button, modifiers }
    }
}

struct Idle;

impl Controller for Idle {
    fn update(&mut self, _: &mut ControllerContext<'_>, _: &Event) -> Result<()> {
        Ok(())
    }
}

//=== Scenarios ===========================================================

#[test]
fn transition_requested_outside_the_loop_is_committed_on_next_tick() {
    let mut h = harness(16);

    h.scenes.request_transition(Screen::Clicked).unwrap();
    assert_eq!(h.scenes.active().unwrap().name(), "Init");

    assert_eq!(h.dispatcher.tick().unwrap(), TickControl::Continue);
    assert_eq!(h.scenes.active().unwrap().name(), "Clicked");
    assert_eq!(h.scenes.pending_transitions(), 0);
}

#[test]
fn controller_receives_message_exactly_once() {
    type Seen = Arc<Mutex<Vec<(Option<u32>, Option<u32>)>>>;

    struct Counter {
        seen: Seen,
    }

    impl Controller for Counter {
        fn update(&mut self, cx: &mut ControllerContext<'_>, _: &Event) -> Result<()> {
            let first = cx.recv_message().and_then(|m| m.into_payload::<u32>().ok());
            let second = cx.recv_message().and_then(|m| m.into_payload::<u32>().ok());
            self.seen.lock().unwrap().push((first, second));
            Ok(())
        }
    }

    let mut h = harness(16);
    let seen: Seen = Arc::default();

    let scene = h.scenes.active().unwrap();
    scene.add_controller("counter", Counter { seen: Arc::clone(&seen) }).unwrap();
    scene
        .add_object("counter", Object::new("counter_board").with_skin(NORMAL))
        .unwrap();

    assert!(h.scenes.bus().send("counter", 7u32).unwrap());
    h.injector.inject(Event::User(1)).unwrap();
    h.dispatcher.tick().unwrap();

    h.injector.inject(Event::User(2)).unwrap();
    h.dispatcher.tick().unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![(Some(7), None), (None, None)]);
    assert_eq!(h.dispatcher.surface().last_frame().len(), 1);
}

#[test]
fn duplicate_controller_name_is_rejected() {
    let h = harness(4);
    let scene = h.scenes.active().unwrap();

    scene.add_controller("hud", Idle).unwrap();
    let err = scene.add_controller("hud", Idle).unwrap_err();

    assert!(matches!(err, Error::DuplicateRegistration { .. }));
    assert_eq!(scene.controller_names(), vec!["hud".to_string()]);
}

#[test]
fn overflowing_a_destination_drops_the_message() {
    let h = harness(4);
    let scene = h.scenes.active().unwrap();
    scene.add_controller("sink", Idle).unwrap();

    let bus = h.scenes.bus();
    for i in 0..1024u32 {
        assert!(bus.send("sink", i).unwrap());
    }
    assert!(!bus.send("sink", 1024u32).unwrap());
    assert_eq!(bus.pending("sink"), 1024);
}

#[test]
fn unknown_destination_is_an_error() {
    let h = harness(4);
    let err = h.scenes.bus().send("nobody", ()).unwrap_err();
    assert!(matches!(err, Error::DestinationNotFound(name) if name == "nobody"));
}

#[test]
fn button_click_switches_scene_in_the_same_tick() {
    let mut h = harness(16);

    let scenes = h.scenes.clone();
    let (button, machine) = Button::new("start", NORMAL)
        .at(10, 10)
        .hovered_sprite(HOVERED)
        .pressed_sprite(PRESSED)
        .on_released(move |_| {
            scenes.request_transition(Screen::Clicked).unwrap();
        })
        .build()
        .unwrap();

    let init = h.scenes.active().unwrap();
    init.add_controller("menu", Idle).unwrap();
    init.add_object("menu", button).unwrap();

    // Hover
    h.injector.inject(input(InputEvent::MouseMoved { x: 50.0, y: 30.0 })).unwrap();
    h.dispatcher.tick().unwrap();
    assert_eq!(machine.active_state().unwrap(), ButtonState::Hovered);
    assert_eq!(
        h.dispatcher.surface().last_frame(),
        &[DrawCommand { rect: Rect::new(10, 10, 100, 40), texture: TextureHandle(2) }]
    );

    // Press
    h.injector.inject(input(left(true))).unwrap();
    h.dispatcher.tick().unwrap();
    assert_eq!(machine.active_state().unwrap(), ButtonState::Pressed);
    assert_eq!(h.dispatcher.surface().last_frame()[0].texture, TextureHandle(3));

    // Release: the marker lands behind the release in the same drain
    h.injector.inject(input(left(false))).unwrap();
    h.dispatcher.tick().unwrap();
    assert_eq!(machine.active_state().unwrap(), ButtonState::Hovered);
    assert_eq!(h.scenes.active().unwrap().name(), "Clicked");
    assert!(h.dispatcher.surface().last_frame().is_empty());
}

#[test]
fn events_after_quit_are_never_dispatched() {
    let mut h = harness(8);
    let seen = Arc::new(Mutex::new(Vec::new()));

    struct Recorder(Arc<Mutex<Vec<Event>>>);

    impl Controller for Recorder {
        fn update(&mut self, _: &mut ControllerContext<'_>, event: &Event) -> Result<()> {
            self.0.lock().unwrap().push(*event);
            Ok(())
        }
    }

    h.scenes
        .active()
        .unwrap()
        .add_controller("recorder", Recorder(Arc::clone(&seen)))
        .unwrap();

    h.injector.inject(Event::User(1)).unwrap();
    h.injector.inject(Event::Quit).unwrap();
    h.injector.inject(Event::User(2)).unwrap();

    assert_eq!(h.dispatcher.tick().unwrap(), TickControl::Exit);
    assert_eq!(h.dispatcher.tick().unwrap(), TickControl::Exit);
    assert_eq!(*seen.lock().unwrap(), vec![Event::User(1)]);
    assert_eq!(h.dispatcher.surface().frames_presented(), 0);
}

#[test]
fn transition_without_an_edge_stops_the_dispatcher() {
    let (injector, source) = event_channel(4);
    let scenes = SceneRegistry::new(Arc::new(MessageBus::new()), injector);
    scenes.add_scene(Screen::Init, "Init").unwrap();
    scenes.add_scene(Screen::Clicked, "Clicked").unwrap();

    let mut dispatcher = Dispatcher::new(scenes.clone(), source, RecordingSurface::new());
    scenes.request_transition(Screen::Clicked).unwrap();

    assert!(matches!(dispatcher.tick(), Err(Error::IllegalTransition { .. })));
    assert!(!dispatcher.is_running());
    assert_eq!(scenes.active().unwrap().name(), "Init");
}

#[test]
fn updates_run_for_every_controller_before_object_callbacks() {
    type Log = Arc<Mutex<Vec<String>>>;

    struct Logged(Log);

    impl Controller for Logged {
        fn update(&mut self, cx: &mut ControllerContext<'_>, event: &Event) -> Result<()> {
            if let Event::User(n) = event {
                self.0.lock().unwrap().push(format!("{}:update:{}", n, cx.name()));
            }
            Ok(())
        }
    }

    fn logged_object(name: &'static str, log: &Log) -> Object {
        let log = Arc::clone(log);
        Object::new(name).on_event(move |_, event| {
            if let Event::User(n) = event {
                log.lock().unwrap().push(format!("{}:callback:{}", n, name));
            }
        })
    }

    let mut h = harness(8);
    let log: Log = Arc::default();
    let scene = h.scenes.active().unwrap();
    for (controller, objects) in [("a", ["a1", "a2"]), ("b", ["b1", "b2"])] {
        scene.add_controller(controller, Logged(Arc::clone(&log))).unwrap();
        for object in objects {
            scene.add_object(controller, logged_object(object, &log)).unwrap();
        }
    }

    h.injector.inject(Event::User(1)).unwrap();
    h.injector.inject(Event::User(2)).unwrap();
    h.dispatcher.tick().unwrap();

    let expected: Vec<String> = [1, 2]
        .iter()
        .flat_map(|n| {
            ["update:a", "update:b", "callback:a1", "callback:a2", "callback:b1", "callback:b2"]
                .map(|step| format!("{}:{}", n, step))
        })
        .collect();
    assert_eq!(*log.lock().unwrap(), expected);
}
