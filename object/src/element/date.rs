use super::string::invalid_value;
use super::{ElementFamily, MultiStringElement, RawElement};
use crate::value::{ValueObject, ValueType};
use crate::{NoValueArraySnafu, Result};
use dcm_core::chrono::NaiveDateTime;
use dcm_core::value::date::today;
use dcm_core::{DateKind, DateRange};
use tracing::warn;

/// A date (DA), time (TM) or date time (DT) element.
///
/// Values are written in the canonical layout of the VR
/// and read against every layout it accepts.
#[derive(Debug, Clone)]
pub struct DateElement {
    inner: MultiStringElement,
    kind: DateKind,
}

impl DateElement {
    pub(crate) fn new(raw: RawElement) -> Self {
        let kind = DateKind::from_vr(raw.vr()).unwrap_or(DateKind::DateTime);
        DateElement {
            inner: MultiStringElement::new(raw),
            kind,
        }
    }

    pub(crate) fn inner(&self) -> &MultiStringElement {
        &self.inner
    }

    pub(crate) fn inner_mut(&mut self) -> &mut MultiStringElement {
        &mut self.inner
    }

    /// The kind of values in this element.
    pub fn kind(&self) -> DateKind {
        self.kind
    }

    fn parse(&self, text: &str) -> NaiveDateTime {
        self.kind.parse(text).unwrap_or_else(|| {
            warn!(
                "Unparsable {:?} value `{}` in element {}, using today",
                self.kind,
                text,
                self.inner.raw().tag()
            );
            today()
        })
    }

    /// The value at `index` as a point in time.
    ///
    /// A value in no accepted layout yields today at midnight.
    pub fn datetime(&self, index: usize) -> Result<NaiveDateTime> {
        Ok(self.parse(&self.inner.value_at(index)?))
    }

    /// All values as points in time.
    pub fn datetimes(&self) -> Result<Vec<NaiveDateTime>> {
        if self.inner.raw().length() == 0 {
            return Ok(Vec::new());
        }
        Ok(self
            .inner
            .values()?
            .iter()
            .map(|v| self.parse(v))
            .collect())
    }

    /// The first value read as a range.
    pub fn date_range(&self) -> Result<DateRange> {
        Ok(DateRange::parse(self.kind, &self.inner.value_at(0)?))
    }

    /// Replace the value with a point in time.
    pub fn set_datetime(&mut self, value: &NaiveDateTime) -> Result<()> {
        self.inner.set_value(&self.kind.format(value))
    }

    /// Replace the value with several points in time.
    pub fn set_datetimes(&mut self, values: &[NaiveDateTime]) -> Result<()> {
        let kind = self.kind;
        self.inner.set_values(values.iter().map(|v| kind.format(v)))
    }

    /// Replace the value with a range, or clear it.
    pub fn set_date_range(&mut self, range: Option<&DateRange>) -> Result<()> {
        match range {
            Some(range) => self.inner.set_value(&range.to_string(self.kind)),
            None => self.inner.set_value(""),
        }
    }
}

impl ElementFamily for DateElement {
    fn raw(&self) -> &RawElement {
        self.inner.raw()
    }

    fn raw_mut(&mut self) -> &mut RawElement {
        self.inner.raw_mut()
    }

    fn vm(&self) -> Result<usize> {
        self.inner.vm()
    }

    fn value_string(&self) -> Result<String> {
        self.inner.value_string()
    }

    fn set_value_string(&mut self, value: &str) -> Result<()> {
        self.inner.set_value(value)
    }

    fn value_type(&self) -> ValueType {
        ValueType::DateTime
    }

    fn value_object(&self) -> Result<Option<ValueObject>> {
        self.datetime(0).map(|v| Some(ValueObject::DateTime(v)))
    }

    fn value_object_array(&self) -> Result<Vec<ValueObject>> {
        NoValueArraySnafu { vr: self.raw().vr() }.fail()
    }

    fn set_value_object(&mut self, value: &ValueObject) -> Result<()> {
        match value {
            ValueObject::DateRange(range) => self.set_date_range(Some(range)),
            ValueObject::DateTime(v) => self.set_datetime(v),
            ValueObject::Str(s) => self.inner.set_value(s),
            v => invalid_value(self.raw(), v),
        }
    }

    fn set_value_object_array(&mut self, _values: &[ValueObject]) -> Result<()> {
        NoValueArraySnafu { vr: self.raw().vr() }.fail()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use dcm_core::chrono::NaiveDate;
    use dcm_core::{Tag, VR};
    use dcm_encoding::buffer::ByteBuffer;
    use dcm_encoding::Endianness;

    fn element(vr: VR) -> DateElement {
        let buffer = ByteBuffer::new(Endianness::Little);
        DateElement::new(RawElement::new(Tag(0x0008, 0x0020), vr, 0, buffer))
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn dates_use_canonical_layout() {
        let mut da = element(VR::DA);
        da.set_datetime(&at(2016, 3, 15, 10, 0, 0)).unwrap();
        assert_eq!(da.value_string().unwrap(), "20160315");
        assert_eq!(da.datetime(0).unwrap(), at(2016, 3, 15, 0, 0, 0));

        // legacy layout still accepted on read
        da.set_value_string("2016.03.15").unwrap();
        assert_eq!(da.datetime(0).unwrap(), at(2016, 3, 15, 0, 0, 0));
    }

    #[test]
    fn ranges() {
        let mut da = element(VR::DA);
        da.set_value_string("20160101-20161231").unwrap();
        let range = da.date_range().unwrap();
        assert_eq!(range.start(), Some(&at(2016, 1, 1, 0, 0, 0)));
        assert_eq!(range.end(), Some(&at(2016, 12, 31, 0, 0, 0)));

        da.set_value_object(&ValueObject::DateRange(DateRange::from_start(at(
            2020, 5, 1, 0, 0, 0,
        ))))
        .unwrap();
        assert_eq!(da.value_string().unwrap(), "20200501-");

        da.set_date_range(None).unwrap();
        assert_eq!(da.vm().unwrap(), 0);
    }

    #[test]
    fn garbage_reads_as_today() {
        let mut tm = element(VR::TM);
        tm.set_value_string("not a time").unwrap();
        assert_eq!(tm.datetime(0).unwrap(), today());
    }

    #[test]
    fn no_value_array() {
        let dt = element(VR::DT);
        assert!(matches!(
            dt.value_object_array(),
            Err(Error::NoValueArray { .. })
        ));
        assert!(matches!(
            element(VR::DA).set_value_object(&ValueObject::U16(1)),
            Err(Error::InvalidValueType { .. })
        ));
    }
}
