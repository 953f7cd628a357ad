// src/common/period.rs

use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use utoipa::ToSchema;

use crate::common::error::AppError;

/// Intervalo fechado de datas usado para agrupar receitas e despesas.
/// Os dois extremos entram no período, incluindo o último instante do dia final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if end < start {
            return Err(AppError::invalid(
                "endDate",
                format!("endDate ({}) is before startDate ({})", end, start),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn month(year: i32, month: u32) -> Result<Self, AppError> {
        // Ano fora do calendário aceito não é culpa do mês
        let whole_year = Self::year(year)?;
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| AppError::invalid("month", format!("{} is not a valid month (1-12)", month)))?;
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(whole_year.end);
        Ok(Self { start, end })
    }

    pub fn year(year: i32) -> Result<Self, AppError> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| AppError::invalid("year", format!("{} is out of range", year)))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| AppError::invalid("year", format!("{} is out of range", year)))?;
        Ok(Self { start, end })
    }

    pub fn month_of(date: NaiveDate) -> Self {
        let start = date.with_day(1).unwrap_or(date);
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(date);
        Self { start, end }
    }

    /// Os `months` meses corridos que terminam no mês de `today`, do mais antigo ao mais recente.
    /// Cada mês tem seus próprios limites (dia 1 00:00 até o último dia 23:59:59).
    pub fn trailing_months(today: NaiveDate, months: u32) -> Vec<Self> {
        let current = Self::month_of(today).start;
        (0..months)
            .rev()
            .filter_map(|back| current.checked_sub_months(Months::new(back)))
            .map(Self::month_of)
            .collect()
    }

    pub fn start_at(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    // Último instante do dia final; evita perder conclusões feitas no mesmo dia.
    pub fn end_at(&self) -> NaiveDateTime {
        let last = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap_or(NaiveTime::MIN);
        self.end.and_time(last)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        self.start_at() <= instant && instant <= self.end_at()
    }

    /// Rótulo usado no gráfico mensal ("2024-03").
    pub fn month_label(&self) -> String {
        self.start.format("%Y-%m").to_string()
    }
}

/// Granularidade aceita pelo resumo financeiro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPeriod {
    Month,
    Year,
}

impl FromStr for ReportPeriod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(ReportPeriod::Month),
            "year" => Ok(ReportPeriod::Year),
            other => Err(AppError::invalid(
                "period",
                format!("unknown period '{}', expected 'month' or 'year'", other),
            )),
        }
    }
}

impl ReportPeriod {
    /// Resolve o período; ano e mês ausentes assumem os de `today`.
    pub fn resolve(self, today: NaiveDate, year: Option<i32>, month: Option<u32>) -> Result<Period, AppError> {
        let year = year.unwrap_or_else(|| today.year());
        match self {
            ReportPeriod::Month => Period::month(year, month.unwrap_or_else(|| today.month())),
            ReportPeriod::Year => Period::year(year),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_end_before_start() {
        let err = Period::new(date(2024, 3, 31), date(2024, 3, 1)).unwrap_err();
        assert_matches!(err, AppError::InvalidInput { field: "endDate", .. });
    }

    #[test]
    fn single_day_period_is_valid() {
        let p = Period::new(date(2024, 3, 15), date(2024, 3, 15)).unwrap();
        assert!(p.contains(date(2024, 3, 15).and_hms_opt(23, 59, 59).unwrap()));
    }

    #[test]
    fn month_bounds_handle_leap_years() {
        let feb = Period::month(2024, 2).unwrap();
        assert_eq!(feb.start, date(2024, 2, 1));
        assert_eq!(feb.end, date(2024, 2, 29));

        let dec = Period::month(2023, 12).unwrap();
        assert_eq!(dec.end, date(2023, 12, 31));
    }

    #[test]
    fn invalid_month_names_the_field() {
        assert_matches!(Period::month(2024, 13), Err(AppError::InvalidInput { field: "month", .. }));
    }

    #[test]
    fn out_of_range_year_names_the_year_field() {
        assert_matches!(Period::month(300_000, 3), Err(AppError::InvalidInput { field: "year", .. }));
        assert_matches!(Period::month(-300_000, 13), Err(AppError::InvalidInput { field: "year", .. }));
        assert_matches!(Period::month(2024, 0), Err(AppError::InvalidInput { field: "month", .. }));
    }

    #[test]
    fn end_of_day_is_inclusive() {
        let march = Period::month(2024, 3).unwrap();
        assert!(march.contains(date(2024, 3, 31).and_hms_opt(23, 59, 59).unwrap()));
        assert!(march.contains(date(2024, 3, 1).and_hms_opt(0, 0, 0).unwrap()));
        assert!(!march.contains(date(2024, 4, 1).and_hms_opt(0, 0, 0).unwrap()));
        assert!(!march.contains(date(2024, 2, 29).and_hms_opt(23, 59, 59).unwrap()));
    }

    #[test]
    fn trailing_months_cross_year_boundary() {
        let months = Period::trailing_months(date(2024, 2, 10), 4);
        let labels: Vec<String> = months.iter().map(Period::month_label).collect();
        assert_eq!(labels, vec!["2023-11", "2023-12", "2024-01", "2024-02"]);
        assert_eq!(months[1].end, date(2023, 12, 31));
    }

    #[test]
    fn report_period_defaults_to_today() {
        let today = date(2024, 3, 20);
        let p = ReportPeriod::Month.resolve(today, None, None).unwrap();
        assert_eq!(p, Period::month(2024, 3).unwrap());

        let y = ReportPeriod::Year.resolve(today, Some(2023), None).unwrap();
        assert_eq!((y.start, y.end), (date(2023, 1, 1), date(2023, 12, 31)));
    }

    #[test]
    fn unknown_report_period_is_rejected() {
        assert_matches!("week".parse::<ReportPeriod>(), Err(AppError::InvalidInput { field: "period", .. }));
        assert_eq!("Year".parse::<ReportPeriod>().unwrap(), ReportPeriod::Year);
    }
}
