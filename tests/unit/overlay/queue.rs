use super::*;
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
        if text.starts_with("bad") {
            return Err(HuploError::render("malformed markup"));
        }
        self.calls.push((origin, text.to_string()));
        Ok(())
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2013, 12, 25, 12, 0, 0).unwrap()
}

fn tick(dt: f64) -> FrameTick {
    FrameTick::new(Canvas::default(), 0.0, dt)
}

fn queue_with_capacity(capacity: usize) -> Queue {
    Queue::new(QueueConfig {
        capacity,
        ..QueueConfig::default()
    })
}

fn reflow_count(msg: &Message) -> usize {
    msg.animation()
        .map(|a| a.links().filter(|l| l.label() == Some("reflow")).count())
        .unwrap_or(0)
}

fn texts(q: &Queue) -> Vec<&str> {
    q.messages().iter().map(Message::text).collect()
}

#[test]
fn overflow_is_dropped_but_still_reflows_existing_messages() {
    let mut q = queue_with_capacity(2);
    assert!(q.add("a").is_some());
    assert!(q.add("b").is_some());
    assert!(q.add("c").is_none());

    assert_eq!(texts(&q), vec!["a", "b"]);
    assert_eq!(q.len(), 2);
    assert_eq!(reflow_count(&q.messages()[0]), 2);
    assert_eq!(reflow_count(&q.messages()[1]), 1);
}

#[test]
fn zero_capacity_queue_never_holds_messages() {
    let mut q = queue_with_capacity(0);
    assert!(q.add("a").is_none());
    assert!(q.is_empty());
}

#[test]
fn new_messages_enter_at_the_baseline() {
    let mut q = Queue::default();
    let id = q.add("hello").unwrap();
    let msg = q.get(id).unwrap();
    assert_eq!(msg.position(), Point::new(1220.0, 550.0));
    assert_eq!(msg.state(), crate::overlay::message::MessageState::Entering);
}

#[test]
fn slide_in_uses_the_last_drawn_canvas() {
    let mut q = Queue::default();
    let mut painter = RecordingPainter::default();
    let t = FrameTick::new(Canvas::new(640, 480).unwrap(), 0.0, 0.0);
    q.on_draw_at(&mut painter, t, now()).unwrap();

    let id = q.add("x").unwrap();
    assert_eq!(q.get(id).unwrap().position().x, 660.0);
}

#[test]
fn remove_is_a_no_op_for_unknown_ids() {
    let mut q = Queue::default();
    let id = q.add("a").unwrap();
    assert!(!q.remove(MessageId(999)));
    assert!(q.remove(id));
    assert!(!q.remove(id));
    assert!(q.is_empty());
}

#[test]
fn expired_message_detaches_itself() {
    let mut q = Queue::default();
    q.add("a");
    q.update(2.5);
    q.update(7.0);
    q.update(0.5);
    assert_eq!(q.len(), 1);
    assert!(q.messages()[0].exit_started());

    q.update(0.5);
    assert!(q.is_empty());
}

#[test]
fn exiting_messages_are_not_reflowed() {
    let mut q = Queue::default();
    q.add("a");
    q.update(2.5);
    q.update(7.0);
    q.update(0.5);

    q.add("b");
    assert_eq!(reflow_count(&q.messages()[0]), 0);
    assert_eq!(texts(&q), vec!["a", "b"]);
}

#[test]
fn message_removed_during_update_is_not_drawn() {
    let mut q = Queue::default();
    q.add("a");
    q.update(2.5);
    q.update(7.0);

    let mut painter = RecordingPainter::default();
    q.on_draw_at(&mut painter, tick(0.5), now()).unwrap();
    assert_eq!(painter.calls.len(), 1);

    q.add("b");
    // "a" finishes its exit during this frame's update pass.
    q.on_draw_at(&mut painter, tick(1.0), now()).unwrap();
    assert_eq!(texts(&q), vec!["b"]);
    assert_eq!(painter.calls.len(), 2);
    assert_eq!(painter.calls[1].1, "b");
}

#[test]
fn clear_stops_all_drawing() {
    let mut q = Queue::default();
    for t in ["a", "b", "c"] {
        q.add(t);
    }
    q.clear();
    assert_eq!(q.len(), 0);

    let mut painter = RecordingPainter::default();
    q.on_draw_at(&mut painter, tick(0.1), now()).unwrap();
    assert!(painter.calls.is_empty());
}

#[test]
fn draw_failures_are_isolated_per_message() {
    let mut q = Queue::default();
    q.add("bad markup");
    q.add("fine %{%Y}%");

    let mut painter = RecordingPainter::default();
    let err = q.on_draw_at(&mut painter, tick(0.1), now()).unwrap_err();
    assert!(err.to_string().contains("1 of 2"));
    assert_eq!(painter.calls.len(), 1);
    assert_eq!(painter.calls[0].1, "fine 2013");
}

#[test]
fn config_accepts_legacy_field_names() {
    let cfg = QueueConfig::from_json(r#"{"size": 3, "y": 400, "pause_in_seconds": 5}"#).unwrap();
    assert_eq!(cfg.capacity, 3);
    assert_eq!(cfg.baseline_y, 400.0);
    assert_eq!(cfg.pause_s, 5.0);
    assert_eq!(cfg.speed, 200.0);
}

#[test]
fn config_rejects_garbage_and_bad_values() {
    assert!(matches!(
        QueueConfig::from_json("not json"),
        Err(HuploError::Config(_))
    ));
    assert!(matches!(
        QueueConfig::from_json(r#"{"enter_s": -1}"#),
        Err(HuploError::Config(_))
    ));
    assert!(matches!(
        QueueConfig::from_json(r#"{"style": {"size_px": 0}}"#),
        Err(HuploError::Config(_))
    ));
}

#[test]
fn flooding_a_full_queue_survives_update_draw_and_clear() {
    let mut q = queue_with_capacity(1);
    assert!(q.add("a").is_some());
    for i in 0..100_000 {
        assert!(q.add(format!("overflow {i}")).is_none());
    }
    assert_eq!(q.len(), 1);
    assert_eq!(reflow_count(&q.messages()[0]), 100_000);

    q.update(0.5);
    let mut painter = RecordingPainter::default();
    q.on_draw_at(&mut painter, tick(0.5), now()).unwrap();
    assert_eq!(painter.calls.len(), 1);

    q.clear();
    assert!(q.is_empty());
}
