//! HID-writer-backed implementation of the report-submit primitive.

use crate::error::SubmitError;
use crate::report::ReportSink;
use crate::usb::device::UsbDriver;
use embassy_usb::class::hid::HidWriter;
use embassy_usb::driver::EndpointError;

/// One HID IN endpoint as a [`ReportSink`].
pub struct UsbReportSink {
    writer: HidWriter<'static, UsbDriver, 8>,
}

impl UsbReportSink {
    pub fn new(writer: HidWriter<'static, UsbDriver, 8>) -> Self {
        Self { writer }
    }
}

impl ReportSink for UsbReportSink {
    async fn submit(&mut self, data: &[u8]) -> Result<(), SubmitError> {
        self.writer.write(data).await.map_err(|e| match e {
            // The endpoint is down while the device is de-configured;
            // the assembler backs off and retries the same report.
            EndpointError::Disabled => SubmitError::EndpointNotReady,
            // A report that cannot fit the endpoint is a logic fault.
            EndpointError::BufferOverflow => SubmitError::Fatal,
        })
    }
}
