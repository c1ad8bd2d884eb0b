use super::*;

#[test]
fn happy_path_transitions_are_allowed() {
    let mut events = Vec::new();
    let mut obs = |e: JobEvent| events.push(e);
    let mut job = ExportJob::new(JobKind::Animated(ExportFormat::Gif));
    job.transition(JobState::Capturing, &mut obs).unwrap();
    job.set_frames_total(2);
    job.frame_done(&mut obs);
    job.frame_done(&mut obs);
    job.transition(JobState::Encoding, &mut obs).unwrap();
    job.complete(&mut obs).unwrap();
    assert_eq!(job.state(), JobState::Done);
    assert_eq!(job.progress(), 100);
    assert_eq!(
        events,
        vec![
            JobEvent::State(JobState::Capturing),
            JobEvent::Progress(50),
            JobEvent::Progress(100),
            JobEvent::State(JobState::Encoding),
            JobEvent::State(JobState::Done),
        ]
    );
}

#[test]
fn skipping_states_is_rejected() {
    let mut job = ExportJob::new(JobKind::Static(ExportFormat::Png));
    assert!(job.transition(JobState::Encoding, &mut NoopObserver).is_err());
    assert!(job.transition(JobState::Done, &mut NoopObserver).is_err());
    assert_eq!(job.state(), JobState::Idle);
    assert!(JobState::Idle.can_transition_to(JobState::Failed));
    assert!(!JobState::Done.can_transition_to(JobState::Failed));
    assert!(!JobState::Cancelled.can_transition_to(JobState::Capturing));
}

#[test]
fn fail_records_detail_and_cancel_is_distinct() {
    let mut job = ExportJob::new(JobKind::Static(ExportFormat::Png));
    job.fail(&ExportError::NoPreviewAvailable, &mut NoopObserver);
    assert_eq!(job.state(), JobState::Failed);
    assert!(job.error_detail().unwrap().contains("no preview"));

    // terminal jobs stay put
    job.fail(&ExportError::Cancelled, &mut NoopObserver);
    assert_eq!(job.state(), JobState::Failed);

    let mut job = ExportJob::new(JobKind::Animated(ExportFormat::Gif));
    job.transition(JobState::Capturing, &mut NoopObserver).unwrap();
    job.fail(&ExportError::Cancelled, &mut NoopObserver);
    assert_eq!(job.state(), JobState::Cancelled);
}

#[test]
fn progress_is_monotonic_and_full_only_at_the_end() {
    assert_eq!(progress_percent(0, 46), 0);
    assert_eq!(progress_percent(23, 46), 50);
    assert_eq!(progress_percent(199, 200), 99);
    assert_eq!(progress_percent(46, 46), 100);
    assert_eq!(progress_percent(0, 0), 100);

    let mut job = ExportJob::new(JobKind::Animated(ExportFormat::Gif));
    job.set_frames_total(3);
    let seen: Vec<u8> = (0..5).map(|_| job.frame_done(&mut NoopObserver)).collect();
    assert_eq!(seen, vec![33, 67, 100, 100, 100]);
    assert_eq!(job.frames_done(), 3);
}

#[test]
fn channel_observer_forwards_and_tolerates_hangup() {
    let (tx, rx) = mpsc::channel();
    let mut obs = tx;
    obs.on_event(JobEvent::Progress(10));
    assert_eq!(rx.recv().unwrap(), JobEvent::Progress(10));
    drop(rx);
    obs.on_event(JobEvent::Progress(20));
}

#[test]
fn cancel_token_is_shared_between_clones() {
    let token = CancelToken::new();
    let other = token.clone();
    assert!(!other.is_cancelled());
    token.cancel();
    assert!(other.is_cancelled());
}
