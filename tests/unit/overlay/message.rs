use super::*;
use crate::foundation::error::HuploError;
use chrono::TimeZone;

#[derive(Default)]
struct RecordingPainter {
    calls: Vec<(Point, String)>,
}

impl TextPainter for RecordingPainter {
    fn paint_text(
        &mut self,
        _canvas: Canvas,
        origin: Point,
        text: &str,
        _style: &TextStyle,
    ) -> HuploResult<()> {
        self.calls.push((origin, text.to_string()));
        Ok(())
    }
}

struct FailingPainter;

impl TextPainter for FailingPainter {
    fn paint_text(&mut self, _: Canvas, _: Point, _: &str, _: &TextStyle) -> HuploResult<()> {
        Err(HuploError::render("boom"))
    }
}

fn entered(y: f64) -> Message {
    let mut msg = Message::new(
        MessageId(1),
        "hello",
        TextStyle::default(),
        Point::new(-900.0, y),
    );
    msg.slide_in(y, Canvas::default());
    msg
}

fn exit_links(msg: &Message) -> usize {
    msg.animation()
        .map(|a| a.links().filter(|l| l.label() == Some(EXIT)).count())
        .unwrap_or(0)
}

#[test]
fn slide_in_starts_offscreen_right_and_bounces_to_fifty() {
    let mut msg = entered(550.0);
    assert_eq!(msg.position(), Point::new(1220.0, 550.0));
    assert_eq!(msg.state(), MessageState::Entering);

    msg.do_update(DEFAULT_ENTER_S);
    assert_eq!(msg.position(), Point::new(50.0, 550.0));
    assert_eq!(msg.state(), MessageState::Idle);
    assert!(msg.animation().is_none());
}

#[test]
fn slide_in_uses_the_canvas_width() {
    let mut msg = Message::new(MessageId(7), "x", TextStyle::default(), Point::ZERO);
    msg.slide_in(100.0, Canvas::new(640, 480).unwrap());
    assert_eq!(msg.position(), Point::new(660.0, 100.0));
}

#[test]
fn second_slide_in_never_restarts_the_entrance() {
    let mut msg = entered(550.0);
    msg.do_update(DEFAULT_ENTER_S);
    msg.slide_in(300.0, Canvas::default());
    assert_eq!(msg.position(), Point::new(50.0, 550.0));
    assert_eq!(msg.state(), MessageState::Idle);
}

#[test]
fn slide_up_queues_behind_the_entrance() {
    let mut msg = entered(550.0);
    msg.slide_up();
    assert_eq!(msg.state(), MessageState::Entering);

    msg.do_update(DEFAULT_ENTER_S);
    assert_eq!(msg.state(), MessageState::ReflowingUp);
    assert_eq!(msg.position().y, 550.0);

    msg.do_update(1.0);
    assert_eq!(msg.position(), Point::new(50.0, 520.0));
    assert_eq!(msg.state(), MessageState::Idle);
}

#[test]
fn time_alive_is_the_sum_of_update_deltas() {
    let mut msg = entered(550.0);
    for dt in [0.25, 0.5, 1.0, -3.0, f64::NAN] {
        msg.do_update(dt);
    }
    assert_eq!(msg.time_alive_s(), 1.75);
}

#[test]
fn exit_begins_on_the_update_that_reaches_ttl() {
    let mut msg = entered(550.0);
    msg.do_update(4.0);
    msg.do_update(4.0);
    assert!(!msg.exit_started());
    assert!(msg.is_viable());

    msg.do_update(4.0);
    assert!(msg.exit_started());
    assert!(!msg.is_viable());
}

#[test]
fn exit_is_queued_once_and_ends_in_removal() {
    let mut msg = entered(550.0);
    msg.do_update(DEFAULT_ENTER_S);
    msg.do_update(7.0);
    assert_eq!(msg.state(), MessageState::Idle);

    msg.do_update(0.5);
    assert_eq!(msg.state(), MessageState::Exiting);
    assert_eq!(msg.position().x, 200.0);
    assert_eq!(exit_links(&msg), 1);

    for _ in 0..5 {
        msg.do_update(0.0);
        msg.slide_out();
    }
    assert_eq!(exit_links(&msg), 1);

    msg.do_update(0.5);
    assert_eq!(msg.state(), MessageState::Removed);
    assert!(msg.is_removed());
    assert_eq!(msg.position().x, 1250.0);
    assert!(msg.animation().is_none());
}

#[test]
fn exiting_message_ignores_reflow_requests() {
    let mut msg = entered(550.0);
    msg.do_update(DEFAULT_ENTER_S);
    msg.slide_out();
    msg.slide_up();
    let labels: Vec<_> = msg
        .animation()
        .unwrap()
        .links()
        .map(|l| l.label())
        .collect();
    assert_eq!(labels, vec![Some(EXIT), Some(REMOVE)]);
}

#[test]
fn draw_resolves_live_dates_at_current_position() {
    let now = Utc.with_ymd_and_hms(2013, 12, 25, 0, 0, 0).unwrap();
    let mut msg = Message::new(
        MessageId(2),
        "year %{%Y}%",
        TextStyle::default(),
        Point::new(50.0, 520.0),
    );
    let mut painter = RecordingPainter::default();
    msg.draw_at(&mut painter, Canvas::default(), now).unwrap();
    assert_eq!(
        painter.calls,
        vec![(Point::new(50.0, 520.0), "year 2013".to_string())]
    );

    msg.detach();
    msg.draw_at(&mut painter, Canvas::default(), now).unwrap();
    assert_eq!(painter.calls.len(), 1);
}

#[test]
fn draw_surfaces_painter_errors() {
    let mut msg = entered(550.0);
    let tick = FrameTick::new(Canvas::default(), 0.0, 0.0);
    assert!(msg.on_draw(&mut FailingPainter, tick).is_err());
}

#[test]
fn invalid_entrance_duration_falls_back_to_the_default() {
    let mut msg = Message::new(MessageId(3), "x", TextStyle::default(), Point::ZERO)
        .with_enter_duration(f64::NAN);
    msg.slide_in(550.0, Canvas::default());
    assert_eq!(msg.animation().map(Animation::remaining_s), Some(DEFAULT_ENTER_S));

    msg.do_update(DEFAULT_ENTER_S);
    assert_eq!(msg.position(), Point::new(50.0, 550.0));
}

#[test]
fn reflow_from_a_non_finite_row_is_dropped() {
    let mut msg = entered(550.0);
    msg.do_update(DEFAULT_ENTER_S);
    msg.set_attr(Attr::Y, f64::INFINITY);

    msg.slide_up();
    assert!(msg.animation().is_none());
    assert_eq!(msg.state(), MessageState::Idle);
}
