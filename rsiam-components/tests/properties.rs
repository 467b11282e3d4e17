//! Properties of the assembled economics and damage equations.
//!
//! These tests build a full model with the climate and mitigation variables fixed, evaluate it
//! and check relations that must hold for every time step and region.

use approx::assert_relative_eq;
use indexmap::IndexMap;
use ndarray::{array, Array2};
use rsiam_components::components::damages::{DamageForm, DamageFunctionParameters};
use rsiam_components::components::{
    calc_gross_gdp, calc_utility, Coacch, CoacchParameters, CobbDouglas, CobbDouglasParameters,
};
use rsiam_components::economics::calc_dkdt;
use rsiam_core::context::{EXOGENOUS_GDP, EXOGENOUS_POPULATION, EXOGENOUS_TFP};
use rsiam_core::evaluate::FixedPointEvaluator;
use rsiam_core::model::{Model, ModelBuilder};
use rsiam_core::standard_variables::{VAR_ABATEMENT_COSTS, VAR_TEMPERATURE, VAR_TOTAL_SLR};
use rsiam_core::timeseries::{RegionalTrajectory, TimeAxis};
use rsiam_core::values::VariableValues;
use std::sync::Arc;

const REGIONS: [&str; 2] = ["EU", "USA"];
const N_TIME: usize = 3;
const T0: f64 = 1.1;

fn regions() -> Vec<String> {
    REGIONS.iter().map(|r| r.to_string()).collect()
}

fn economics(disutility_dmg_factor: f64, ignore_damages: bool) -> CobbDouglasParameters {
    CobbDouglasParameters {
        alpha: 0.3,
        dk: 0.1,
        sr: 0.2,
        elasmu: 1.5,
        disutility_dmg_factor,
        ignore_damages,
        init_capitalstock_factor: IndexMap::from([
            ("EU".to_string(), 3.0),
            ("USA".to_string(), 2.5),
        ]),
    }
}

fn damages() -> CoacchParameters {
    let quadratic = DamageFunctionParameters {
        form: DamageForm::Quadratic,
        b1: 0.0,
        b2: 1.0,
        b3: 0.0,
        a: 1.0,
    };
    let linear = DamageFunctionParameters {
        form: DamageForm::Linear,
        b1: 2.0,
        b2: 0.0,
        b3: 0.0,
        a: 1.0,
    };
    CoacchParameters {
        noslr: REGIONS
            .iter()
            .map(|r| (r.to_string(), quadratic.clone()))
            .collect(),
        slr: REGIONS
            .iter()
            .map(|r| (r.to_string(), linear.clone()))
            .collect(),
    }
}

/// A model over 2020-2030 with constant exogenous data, fixed mitigation and no damage component
fn economics_only(economics: CobbDouglasParameters, abatement: f64) -> ModelBuilder {
    let years = array![2020.0, 2030.0];

    let mut builder = ModelBuilder::new();
    builder
        .with_time_axis(TimeAxis::new(2020.0, 5.0, N_TIME))
        .with_regions(regions())
        .with_t0(T0)
        .with_exogenous(
            EXOGENOUS_TFP,
            RegionalTrajectory::constant(years.clone(), REGIONS.len(), 1.0).unwrap(),
        )
        .with_exogenous(
            EXOGENOUS_POPULATION,
            RegionalTrajectory::constant(years.clone(), REGIONS.len(), 100.0).unwrap(),
        )
        .with_exogenous(
            EXOGENOUS_GDP,
            RegionalTrajectory::new(years, array![[100.0, 200.0], [150.0, 250.0]]).unwrap(),
        )
        .with_fixed_variable(
            VAR_ABATEMENT_COSTS,
            Array2::from_elem((N_TIME, REGIONS.len()), abatement),
        )
        .with_component(Arc::new(CobbDouglas::from_parameters(economics).unwrap()));
    builder
}

/// [`economics_only`] with fixed climate and the damage component
fn builder(economics: CobbDouglasParameters, temperature: f64, abatement: f64) -> ModelBuilder {
    let mut builder = economics_only(economics, abatement);
    builder
        .with_fixed_variable(VAR_TEMPERATURE, Array2::from_elem((N_TIME, 1), temperature))
        .with_fixed_variable(VAR_TOTAL_SLR, array![[0.0], [0.1], [0.2]])
        .with_component(Arc::new(Coacch::from_parameters(damages()).unwrap()));
    builder
}

fn evaluate(model: &Model) -> VariableValues {
    let values = model.evaluate(&FixedPointEvaluator::default()).unwrap();
    assert!(model.constraints().max_abs_residual(&values).unwrap() < 1e-8);
    values
}

fn get<'a>(values: &'a VariableValues, name: &str) -> &'a Array2<f64> {
    values.get(name).unwrap()
}

#[test]
fn output_is_either_invested_or_consumed() {
    let model = builder(economics(1.0, false), 2.0, 1.0).build().unwrap();
    let values = evaluate(&model);

    let net = get(&values, "GDP_net");
    let investments = get(&values, "investments");
    let consumption = get(&values, "consumption");
    for t in 0..N_TIME {
        for r in 0..REGIONS.len() {
            assert_relative_eq!(
                investments[[t, r]] + consumption[[t, r]],
                net[[t, r]],
                max_relative = 1e-12
            );
        }
    }
}

#[test]
fn damages_and_abatement_reduce_output() {
    let model = builder(economics(1.0, false), 2.5, 1.0).build().unwrap();
    let values = evaluate(&model);

    let gross = get(&values, "GDP_gross");
    let net = get(&values, "GDP_net");
    let damage_costs = get(&values, "damage_costs");
    for t in 0..N_TIME {
        for r in 0..REGIONS.len() {
            assert!(damage_costs[[t, r]] > 0.0);
            assert!(net[[t, r]] < gross[[t, r]]);
            assert_relative_eq!(
                net[[t, r]],
                gross[[t, r]] * (1.0 - damage_costs[[t, r]]) - 1.0,
                max_relative = 1e-10
            );
        }
    }
}

#[test]
fn damages_anchored_at_initial_temperature() {
    let model = builder(economics(1.0, false), T0, 0.0).build().unwrap();
    let values = evaluate(&model);

    let resid = get(&values, "resid_damages");
    let slr = get(&values, "SLR_damages");
    let total = get(&values, "damage_costs");
    for t in 0..N_TIME {
        for r in 0..REGIONS.len() {
            assert_relative_eq!(resid[[t, r]], 0.0, epsilon = 1e-15);
            // Linear sea-level rise damages, 2 * SLR percent of GDP
            assert_relative_eq!(slr[[t, r]], 2.0 * 0.1 * t as f64 / 100.0, epsilon = 1e-15);
            assert_relative_eq!(total[[t, r]], slr[[t, r]], epsilon = 1e-15);
        }
    }
}

#[test]
fn temperature_damages() {
    let model = builder(economics(1.0, false), 2.0, 0.0).build().unwrap();
    let values = evaluate(&model);

    // Quadratic with b2 = 1: (2^2 - 1.1^2) / 100
    let expected = (4.0 - T0 * T0) / 100.0;
    for r in 0..REGIONS.len() {
        assert_relative_eq!(
            get(&values, "resid_damages")[[1, r]],
            expected,
            max_relative = 1e-12
        );
    }
}

#[test]
fn disutility_factor_selects_utility() {
    let values = evaluate(&builder(economics(0.0, false), 2.5, 1.0).build().unwrap());
    let utility = get(&values, "utility");
    let less_mit = get(&values, "utility_less_mit");
    for (u, l) in utility.iter().zip(less_mit.iter()) {
        assert_relative_eq!(*u, *l, max_relative = 1e-12);
    }

    let values = evaluate(&builder(economics(1.0, false), 2.5, 1.0).build().unwrap());
    let utility = get(&values, "utility");
    let original = get(&values, "utility_original");
    for (u, o) in utility.iter().zip(original.iter()) {
        assert_relative_eq!(*u, *o, max_relative = 1e-12);
    }

    // Damages lower consumption, so only counting mitigation costs gives higher utility
    let less_mit = get(&values, "utility_less_mit");
    for (u, l) in utility.iter().zip(less_mit.iter()) {
        assert!(u < l);
    }
}

#[test]
fn utility_of_consumption() {
    let values = evaluate(&builder(economics(1.0, false), 2.0, 0.0).build().unwrap());
    let consumption = get(&values, "consumption");
    let utility = get(&values, "utility_original");
    for t in 0..N_TIME {
        for r in 0..REGIONS.len() {
            assert_relative_eq!(
                utility[[t, r]],
                calc_utility(consumption[[t, r]], 100.0, 1.5),
                max_relative = 1e-12
            );
        }
    }
}

#[test]
fn ignoring_damages() {
    let model = economics_only(economics(1.0, true), 2.0).build().unwrap();
    assert_eq!(model.component_names(), vec!["CobbDouglas".to_string()]);
    assert!(!model.context().is_declared("damage_costs"));

    let values = evaluate(&model);
    let gross = get(&values, "GDP_gross");
    let net = get(&values, "GDP_net");
    for t in 0..N_TIME {
        for r in 0..REGIONS.len() {
            assert_relative_eq!(net[[t, r]], gross[[t, r]] - 2.0, max_relative = 1e-12);
        }
    }
}

#[test]
fn ignored_damages_are_still_computed() {
    let model = builder(economics(1.0, true), 2.5, 2.0).build().unwrap();
    assert!(model.context().is_declared("damage_costs"));

    let values = evaluate(&model);
    let gross = get(&values, "GDP_gross");
    let net = get(&values, "GDP_net");
    let damage_costs = get(&values, "damage_costs");
    for t in 0..N_TIME {
        for r in 0..REGIONS.len() {
            assert!(damage_costs[[t, r]] > 0.0);
            assert_relative_eq!(net[[t, r]], gross[[t, r]] - 2.0, max_relative = 1e-12);
        }
    }
}

#[test]
fn abatement_exceeding_output() {
    // Abatement costs above gross output in every region and time step
    let model = builder(economics(1.0, false), 2.0, 400.0).build().unwrap();
    let values = evaluate(&model);

    for name in values.names() {
        assert!(
            get(&values, name).iter().all(|v| v.is_finite()),
            "{} is not finite",
            name
        );
    }

    let gross = get(&values, "GDP_gross");
    let net = get(&values, "GDP_net");
    let consumption = get(&values, "consumption");
    for t in 0..N_TIME {
        for r in 0..REGIONS.len() {
            assert!(gross[[t, r]] > 0.0);
            assert!(net[[t, r]] < 0.0);
            assert!(consumption[[t, r]] < 0.0);
        }
    }
    // Negative investments run the capital stock below zero
    assert!(get(&values, "capital_stock")[[1, 0]] < 0.0);

    let baseline = evaluate(&builder(economics(1.0, false), 2.0, 0.0).build().unwrap());
    let utility = get(&values, "utility");
    for (u, b) in utility.iter().zip(get(&baseline, "utility").iter()) {
        assert!(u < b);
    }
}

#[test]
fn capital_stock_initialisation() {
    let model = builder(economics(1.0, false), 2.0, 0.0).build().unwrap();

    // Starting values follow the baseline GDP trajectory
    let declaration = model.context().declaration("capital_stock").unwrap();
    let initial = declaration.initial.as_ref().unwrap();
    assert_relative_eq!(initial[[0, 0]], 300.0);
    assert_relative_eq!(initial[[2, 1]], 2.5 * 250.0);

    let init = model.constraints().by_name("capital_stock_init").count();
    assert_eq!(init, REGIONS.len());

    let values = evaluate(&model);
    let capital = get(&values, "capital_stock");
    assert_relative_eq!(capital[[0, 0]], 300.0);
    assert_relative_eq!(capital[[0, 1]], 500.0);
}

#[test]
fn capital_recurrence_is_satisfied() {
    let economics = economics(1.0, false);
    let (dk, dt) = (economics.dk, 5.0);
    let model = builder(economics, 1.5, 0.0).build().unwrap();
    let values = evaluate(&model);

    let capital = get(&values, "capital_stock");
    let investments = get(&values, "investments");
    for t in 1..N_TIME {
        for r in 0..REGIONS.len() {
            let k = capital[[t, r]];
            assert_relative_eq!(
                k,
                capital[[t - 1, r]] + dt * calc_dkdt(k, dk, investments[[t, r]], dt),
                max_relative = 1e-10
            );
        }
    }

    for constraint in model.constraints().by_name("capital_stock") {
        assert!(constraint.equation.residual(&values).unwrap().abs() < 1e-8);
    }
}

/// Root of an increasing function on `[lower, upper]`
fn bisect(f: impl Fn(f64) -> f64, mut lower: f64, mut upper: f64) -> f64 {
    assert!(f(lower) < 0.0 && f(upper) > 0.0);
    for _ in 0..200 {
        let mid = 0.5 * (lower + upper);
        if f(mid) < 0.0 {
            lower = mid;
        } else {
            upper = mid;
        }
    }
    0.5 * (lower + upper)
}

#[test]
fn two_step_scenario() {
    // One region over two 5 year steps. No abatement, TFP 1, population 100 and a constant
    // baseline GDP of 100, so K0 = 300. Temperature stays at T0 and sea level does not rise.
    let years = array![2020.0, 2030.0];
    let mut builder = ModelBuilder::new();
    builder
        .with_time_axis(TimeAxis::new(2020.0, 5.0, 2))
        .with_regions(vec!["EU".to_string()])
        .with_t0(T0)
        .with_exogenous(
            EXOGENOUS_TFP,
            RegionalTrajectory::constant(years.clone(), 1, 1.0).unwrap(),
        )
        .with_exogenous(
            EXOGENOUS_POPULATION,
            RegionalTrajectory::constant(years.clone(), 1, 100.0).unwrap(),
        )
        .with_exogenous(
            EXOGENOUS_GDP,
            RegionalTrajectory::constant(years, 1, 100.0).unwrap(),
        )
        .with_fixed_variable(VAR_ABATEMENT_COSTS, Array2::zeros((2, 1)))
        .with_fixed_variable(VAR_TEMPERATURE, Array2::from_elem((2, 1), T0))
        .with_fixed_variable(VAR_TOTAL_SLR, Array2::zeros((2, 1)))
        .with_component(Arc::new(
            CobbDouglas::from_parameters(economics(1.0, false)).unwrap(),
        ))
        .with_component(Arc::new(Coacch::from_parameters(damages()).unwrap()));
    let values = evaluate(&builder.build().unwrap());

    let (alpha, dk, sr, dt) = (0.3, 0.1, 0.2, 5.0);
    let k0 = 300.0_f64;
    let gross = get(&values, "GDP_gross");
    let capital = get(&values, "capital_stock");
    assert_relative_eq!(capital[[0, 0]], k0);
    assert_relative_eq!(
        gross[[0, 0]],
        100.0_f64.powf(0.7) * k0.powf(0.3),
        max_relative = 1e-12
    );
    for damage in get(&values, "damage_costs").iter() {
        assert_relative_eq!(*damage, 0.0, epsilon = 1e-15);
    }

    // Depreciation and investments are both taken at the end of the step, so K1 is the root
    // of K - K0 - dt * dK/dt(K) with output produced by K itself
    let k1 = bisect(
        |k| {
            let investments = sr * calc_gross_gdp(1.0, 100.0, k, alpha);
            k - k0 - dt * calc_dkdt(k, dk, investments, dt)
        },
        150.0,
        600.0,
    );
    assert_relative_eq!(capital[[1, 0]], k1, max_relative = 1e-9);
    assert_relative_eq!(
        gross[[1, 0]],
        100.0_f64.powf(0.7) * k1.powf(0.3),
        max_relative = 1e-9
    );
    assert_relative_eq!(
        get(&values, "investments")[[1, 0]],
        sr * gross[[1, 0]],
        max_relative = 1e-12
    );
}

#[test]
fn graph_orders_damages_first() {
    let model = builder(economics(1.0, false), 2.0, 0.0).build().unwrap();
    assert_eq!(
        model.component_names(),
        vec!["Coacch".to_string(), "CobbDouglas".to_string()]
    );
    assert!(format!("{:?}", model.as_dot()).contains("damage_costs"));
}
