use stockchart::core::point::stock_field;
use stockchart::core::{AxisRange, PointKind, Series, Side};
use stockchart::error::ChartError;
use stockchart::indicators::{
    BollingerParams, EnvelopesParams, IndicatorParams, RsiParams, SmaParams, StochasticParams,
};
use stockchart::StockChart;

fn chart_with_bars(count: usize) -> (StockChart, String) {
    let mut chart = StockChart::new();
    let area = chart.add_area();
    let mut price = Series::new("price", PointKind::Stock);
    for i in 0..count {
        let close = 50.0 + (i as f64 * 0.3).cos() * 4.0 + i as f64 * 0.05;
        price
            .add_stock_point(close - 0.5, close + 1.0, close - 1.0, close)
            .expect("bar");
    }
    chart.add_series(&area, price).expect("price");
    (chart, area)
}

#[test]
fn destination_names_follow_tag_id_and_suffix() {
    let (mut chart, area) = chart_with_bars(60);
    let bollinger = chart
        .add_bollinger_bands("price", stock_field::CLOSE, BollingerParams::default())
        .expect("bollinger");
    let envelopes = chart
        .add_envelopes("price", stock_field::CLOSE, EnvelopesParams::default())
        .expect("envelopes");

    let names = chart
        .indicators()
        .get(bollinger)
        .expect("bollinger")
        .output_names();
    let id = bollinger.0;
    assert_eq!(
        names,
        vec![
            format!("bollinger{id}"),
            format!("bollinger{id}.upper"),
            format!("bollinger{id}.lower"),
        ]
    );

    let area = chart.area(&area).expect("area");
    assert_eq!(area.series_names().len(), 6);
    let lower = format!("envelopes{}.lower", envelopes.0);
    assert_eq!(chart.indicators().owner_of(&lower), Some(envelopes));
    assert_eq!(chart.indicators().len(), 2);
}

#[test]
fn oscillator_sub_area_scales_to_its_output() {
    let (mut chart, _) = chart_with_bars(80);
    let id = chart
        .add_rsi("price", stock_field::CLOSE, RsiParams::default())
        .expect("rsi");
    chart.recalc();

    let output_name = format!("rsi{}", id.0);
    let sub = chart.area_of_series(&output_name).expect("sub area");
    let y = sub.axis(Side::Right).range();
    let (max, min) = (
        y.max_or_auto_value().expect("max"),
        y.min_or_auto_value().expect("min"),
    );
    assert!(min >= 0.0 && max <= 100.0, "rsi range [{min}, {max}]");
}

#[test]
fn update_indicator_recomputes_with_new_period() {
    let (mut chart, _) = chart_with_bars(50);
    let id = chart
        .add_sma("price", stock_field::CLOSE, SmaParams { period: 10 })
        .expect("sma");
    let name = format!("sma{}", id.0);
    assert_eq!(chart.series(&name).expect("sma").point_count(), 41);

    chart
        .update_indicator(id, IndicatorParams::Sma(SmaParams { period: 20 }))
        .expect("update");
    let output = chart.series(&name).expect("sma");
    assert_eq!(output.point_count(), 31);
    assert_eq!(output.index_offset(), 19);

    assert!(chart
        .update_indicator(id, IndicatorParams::Rsi(RsiParams::default()))
        .is_err());
    assert!(matches!(
        chart.update_indicator(id, IndicatorParams::Sma(SmaParams { period: 0 })),
        Err(ChartError::InvalidPeriod { .. })
    ));
}

#[test]
fn removing_an_overlay_keeps_the_area() {
    let (mut chart, area) = chart_with_bars(30);
    let id = chart
        .add_sma("price", stock_field::CLOSE, SmaParams { period: 5 })
        .expect("sma");
    let removed = chart.remove_indicator(id).expect("remove");

    assert_eq!(removed.id(), id);
    assert_eq!(chart.areas().len(), 1);
    assert_eq!(chart.area(&area).expect("area").series_names(), ["price"]);
    assert!(chart.series(&format!("sma{}", id.0)).is_none());
}

#[test]
fn stochastic_reads_bar_high_low() {
    let (mut chart, _) = chart_with_bars(40);
    let id = chart
        .add_stochastic("price", stock_field::CLOSE, StochasticParams::default())
        .expect("stochastic");
    let outputs = chart.indicators().get(id).expect("stochastic").outputs();
    assert_eq!(outputs.len(), 2);

    let k = outputs[0].field_values(0).expect("k");
    assert_eq!(k.len(), 40 - 20 - 3 + 1);
    assert!(k.iter().all(|value| (0.0..=100.0).contains(value)));
}

#[test]
fn global_x_range_covers_indicator_areas() {
    let (mut chart, _) = chart_with_bars(40);
    chart.enable_global_axis_range(Side::Bottom, AxisRange::default());
    chart
        .add_rsi("price", stock_field::CLOSE, RsiParams { period: 5 })
        .expect("rsi");
    chart.recalc();

    for area in chart.areas() {
        let x = area.axis(Side::Bottom).active_range();
        assert_eq!(x.min_or_auto_value(), Some(-1.0));
        assert_eq!(x.max_or_auto_value(), Some(40.0));
    }
}

#[test]
fn indicator_read_by_another_cannot_be_removed() {
    let (mut chart, area) = chart_with_bars(30);
    let base = chart
        .add_sma("price", stock_field::CLOSE, SmaParams { period: 3 })
        .expect("sma");
    let chained = chart
        .add_sma(&format!("sma{}", base.0), 0, SmaParams { period: 3 })
        .expect("sma of sma");

    assert!(matches!(
        chart.remove_indicator(base),
        Err(ChartError::IndicatorInUse { id, dependent }) if id == base && dependent == chained
    ));
    assert_eq!(chart.indicators().len(), 2);
    assert!(chart
        .area(&area)
        .expect("area")
        .contains_series(&format!("sma{}", base.0)));

    chart
        .series_mut("price")
        .expect("price")
        .add_stock_point(50.0, 51.0, 49.0, 50.5)
        .expect("bar");
    chart.recalc_indicators();
    let chained_name = format!("sma{}", chained.0);
    assert_eq!(chart.series(&chained_name).expect("chained").point_count(), 27);

    chart.remove_indicator(chained).expect("remove dependent");
    chart.remove_indicator(base).expect("remove base");
    assert!(chart.indicators().is_empty());
    assert_eq!(chart.area(&area).expect("area").series_names(), ["price"]);
}
