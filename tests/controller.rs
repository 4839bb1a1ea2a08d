use std::time::Duration;

use bgswitcher::sim::{SimDocument, SimLayer};
use bgswitcher::{
    Background, Configuration, Controller, ImageSource, Layer, Phase, Point, Size, SwitcherError,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

const INTERVAL: Duration = Duration::from_millis(100);
const FADE: Duration = Duration::from_millis(40);

fn config(images: ImageSource) -> Configuration {
    Configuration {
        interval: INTERVAL,
        fade_speed: FADE,
        ..Configuration::new(images)
    }
}

fn urls(n: usize) -> ImageSource {
    ImageSource::list((0..n).map(|i| format!("img{i}.png")))
}

fn panel_document() -> (SimDocument, SimLayer) {
    let mut doc = SimDocument::new(Size::new(800.0, 600.0));
    let body = doc.body();
    let panel = doc.append_element(&body, "div");
    panel.set_offset(Point::new(10.0, 20.0));
    panel.set_size(Size::new(400.0, 300.0));
    (doc, panel)
}

#[test]
fn order_strategy_index_is_tick_count_mod_len() {
    for len in [2, 3, 5] {
        let (mut doc, panel) = panel_document();
        let mut controller = Controller::new(&mut doc, panel, config(urls(len))).unwrap();
        assert_eq!(controller.current_index(), 0);

        for ticks in 1..=12 {
            controller.update(INTERVAL);
            assert_eq!(controller.current_index(), ticks % len);
        }
    }
}

#[test]
fn several_due_ticks_in_one_update_all_fire() {
    let (mut doc, panel) = panel_document();
    let mut controller = Controller::new(&mut doc, panel, config(urls(4))).unwrap();

    controller.update(INTERVAL * 3);

    assert_eq!(controller.current_index(), 3);
}

#[test]
fn content_layer_follows_the_current_image() {
    let (mut doc, panel) = panel_document();
    let mut controller = Controller::new(&mut doc, panel, config(urls(3))).unwrap();
    let layers = controller.layers().unwrap().clone();
    assert_eq!(layers.content.background().image.as_deref(), Some("img0.png"));
    assert!(!layers.fade.is_visible());

    controller.update(INTERVAL);

    assert!(controller.is_fading());
    assert_eq!(layers.content.background().image.as_deref(), Some("img1.png"));
    assert_eq!(layers.fade.background().image.as_deref(), Some("img0.png"));

    controller.update(FADE);

    assert!(!controller.is_fading());
    assert_eq!(layers.fade.opacity(), 0.0);
    assert!(!layers.fade.is_visible());
}

#[test]
fn without_fade_the_target_itself_changes() {
    let (mut doc, panel) = panel_document();
    let config = Configuration {
        fade_speed: Duration::ZERO,
        ..config(urls(2))
    };
    let mut controller = Controller::new(&mut doc, panel.clone(), config).unwrap();
    assert!(controller.layers().is_none());
    assert_eq!(doc.children(&doc.body()), vec![panel.clone()]);

    controller.update(INTERVAL);

    assert_eq!(panel.background().image.as_deref(), Some("img1.png"));
}

#[test]
fn random_strategy_never_repeats() {
    let (mut doc, panel) = panel_document();
    let config = Configuration {
        random: true,
        ..config(urls(3))
    };
    let mut controller =
        Controller::with_rng(&mut doc, panel, config, StdRng::seed_from_u64(7)).unwrap();

    let mut previous = controller.current_index();
    for _ in 0..100 {
        controller.update(INTERVAL);
        assert_ne!(controller.current_index(), previous);
        previous = controller.current_index();
    }
    assert!(controller.is_running());
}

#[test]
fn without_loop_rotation_stops_on_last_image() {
    let (mut doc, panel) = panel_document();
    let config = Configuration {
        looping: false,
        ..config(urls(3))
    };
    let mut controller = Controller::new(&mut doc, panel, config).unwrap();

    controller.update(INTERVAL * 10);

    assert_eq!(controller.current_index(), 2);
    assert_eq!(controller.state().phase, Phase::Stopped);

    controller.update(INTERVAL * 10);
    assert_eq!(controller.current_index(), 2);
    assert!(!controller.is_running());

    controller.start();
    controller.update(INTERVAL);
    assert_eq!(controller.current_index(), 0);
    assert!(controller.is_running());
}

#[test]
fn reset_always_ends_running_on_first_image() {
    let (mut doc, panel) = panel_document();
    let mut controller = Controller::new(&mut doc, panel, config(urls(4))).unwrap();
    let content = controller.layers().unwrap().content.clone();

    controller.update(INTERVAL * 2);
    controller.stop();
    controller.reset();

    assert_eq!(controller.current_index(), 0);
    assert!(controller.is_running());
    assert_eq!(content.background().image.as_deref(), Some("img0.png"));

    controller.reset();
    assert_eq!(controller.current_index(), 0);
    assert!(controller.is_running());
}

#[test]
fn stop_and_toggle_control_ticks() {
    let (mut doc, panel) = panel_document();
    let config = Configuration {
        auto_start: false,
        ..config(urls(3))
    };
    let mut controller = Controller::new(&mut doc, panel, config).unwrap();
    assert!(!controller.is_running());

    controller.update(INTERVAL * 5);
    assert_eq!(controller.current_index(), 0);

    controller.toggle();
    controller.update(INTERVAL);
    assert_eq!(controller.current_index(), 1);

    controller.toggle();
    controller.update(INTERVAL * 5);
    assert_eq!(controller.current_index(), 1);
}

#[test]
fn body_target_forces_resize_tracking() {
    let mut doc = SimDocument::new(Size::new(800.0, 600.0));
    let body = doc.body();
    let config = config(urls(2));
    assert!(!config.resize);

    let controller = Controller::new(&mut doc, body.clone(), config).unwrap();
    assert!(controller.tracks_resize());

    body.set_size(Size::new(1200.0, 600.0));
    controller.on_resize();

    let layers = controller.layers().unwrap();
    assert_eq!(layers.root.as_ref().unwrap().inner_size().width, 1200.0);
    assert_eq!(layers.fade.inner_size().width, 1200.0);
    assert_eq!(layers.content.inner_size().width, 1200.0);
    assert_eq!(body.background(), Background::none());
}

#[test]
fn element_target_tracks_resize_only_when_asked() {
    let (mut doc, panel) = panel_document();
    let controller = Controller::new(&mut doc, panel, config(urls(2))).unwrap();
    assert!(!controller.tracks_resize());

    let (mut doc, panel) = panel_document();
    let config = Configuration {
        resize: true,
        ..config(urls(2))
    };
    let controller = Controller::new(&mut doc, panel.clone(), config).unwrap();
    assert!(controller.tracks_resize());

    panel.set_size(Size::new(250.0, 300.0));
    controller.on_resize();
    assert_eq!(controller.layers().unwrap().fade.inner_size().width, 250.0);
}

#[test]
fn fading_the_document_root_fails_without_mutation() {
    let mut doc = SimDocument::new(Size::new(800.0, 600.0));
    let html = doc.root_element();
    let before = doc.mutations();

    let err = Controller::new(&mut doc, html, config(urls(2))).unwrap_err();

    assert!(matches!(err, SwitcherError::UnsupportedTarget(_)));
    assert_eq!(doc.mutations(), before);
}

#[test]
fn document_root_without_fade_is_switched_directly() {
    let mut doc = SimDocument::new(Size::new(800.0, 600.0));
    let html = doc.root_element();
    let config = Configuration {
        fade_speed: Duration::ZERO,
        ..config(urls(2))
    };

    Controller::new(&mut doc, html.clone(), config).unwrap();

    assert_eq!(html.background().image.as_deref(), Some("img0.png"));
}

#[test]
fn fewer_than_two_images_is_a_configuration_error() {
    for images in [urls(0), urls(1), ImageSource::template("bg.jpg", 3, 3)] {
        let (mut doc, panel) = panel_document();
        let before = doc.mutations();

        let err = Controller::new(&mut doc, panel, config(images)).unwrap_err();

        assert!(matches!(err, SwitcherError::Configuration(_)));
        assert_eq!(doc.mutations(), before);
    }

    let (mut doc, panel) = panel_document();
    let err = Controller::new(&mut doc, panel, Configuration::default()).unwrap_err();
    assert!(matches!(err, SwitcherError::Configuration(_)));
}

#[test]
fn template_images_are_expanded_and_prefetched() {
    let (mut doc, panel) = panel_document();

    let controller =
        Controller::new(&mut doc, panel, config(ImageSource::template("bg.jpg", 1, 3))).unwrap();

    assert_eq!(
        controller.images().as_slice(),
        ["bg1.jpg", "bg2.jpg", "bg3.jpg"]
    );
    assert_eq!(doc.prefetched(), vec!["bg1.jpg", "bg2.jpg", "bg3.jpg"]);
}
