//! Keyboard report assembler.
//!
//! Maintains the active-key set across press/release/modifier events
//! and emits a boot-keyboard report only when the set actually
//! changes.  Submission retry semantics mirror the mouse assembler,
//! with independent counters.

#[cfg(feature = "embedded")]
pub async fn run(sink: &mut impl super::ReportSink) -> ! {
    use crate::hid::keyboard::{KeyApply, KeyboardReport, KEYBOARD_REPORT_SIZE};
    use crate::{ipc, stats};

    ipc::KEYBOARD_START.wait().await;
    defmt::info!("keyboard reporting started");

    let mut report = KeyboardReport::new();
    let mut buf = [0u8; KEYBOARD_REPORT_SIZE];

    loop {
        // Submit the current state (the first pass reports the empty
        // set), then absorb events until one dirties the report.
        let n = report.serialize(&mut buf);
        super::submit_with_retry(sink, &buf[..n], &stats::STATS.keyboard).await;

        loop {
            let event = ipc::KEY_EVENTS.receive().await;
            match report.apply(&event) {
                KeyApply::Dirty => break,
                KeyApply::Clean => {}
                KeyApply::Overflow => {
                    defmt::warn!("active key set full, press dropped");
                }
            }
        }
    }
}
