use super::error::ProjectionError;
use super::formulas::{
    Compounding, future_value_of_annuity, future_value_of_lump_sum, inflation_adjusted_target,
    monthly_rate, months_in, present_value_of_annuity, real_value, required_annuity_contribution,
};
use super::types::{
    GoalPlan, Plan, ProjectionInput, ProjectionResult, RetirementAssumptions, RetirementPlan,
    ScenarioReport, SipProjection,
};
use super::validate;

fn percent(rate: f64) -> f64 {
    rate / 100.0
}

/// Dispatches on [`Plan`]: contributions project a SIP, targets plan a goal,
/// expenses plan retirement.
pub fn project(
    input: &ProjectionInput,
    assumptions: &RetirementAssumptions,
) -> Result<ScenarioReport, ProjectionError> {
    match input.plan {
        Plan::MonthlyContribution(_) => project_sip(input).map(ScenarioReport::Sip),
        Plan::TargetAmount(_) => plan_goal(input).map(ScenarioReport::Goal),
        Plan::MonthlyExpense(_) => {
            plan_retirement(input, assumptions).map(ScenarioReport::Retirement)
        }
    }
}

pub fn project_sip(input: &ProjectionInput) -> Result<SipProjection, ProjectionError> {
    let Plan::MonthlyContribution(monthly) = input.plan else {
        return Err(ProjectionError::invalid(
            "plan",
            "SIP projection needs a monthly contribution",
        ));
    };
    let monthly = validate::amount("monthlyContribution", monthly)?;
    let years = input.validated_horizon()?;

    let annual_rate = percent(input.annual_return_rate);
    let months = months_in(years);

    let total_investment = validate::finite(
        "total investment",
        input.principal + monthly * f64::from(months),
    )?;
    let contributions_value = future_value_of_annuity(monthly, monthly_rate(annual_rate), months)?;
    let principal_value =
        future_value_of_lump_sum(input.principal, annual_rate, years, Compounding::Monthly)?;
    let total_value = validate::monetary("total value", contributions_value + principal_value)?;
    let inflation_adjusted_value =
        real_value(total_value, percent(input.annual_inflation_rate), years)?;

    let projection = ProjectionResult::new(total_value, monthly, total_investment)?;
    Ok(SipProjection {
        total_investment,
        estimated_returns: total_value - total_investment,
        total_value,
        inflation_adjusted_value,
        projection,
    })
}

pub fn plan_retirement(
    input: &ProjectionInput,
    assumptions: &RetirementAssumptions,
) -> Result<RetirementPlan, ProjectionError> {
    let Plan::MonthlyExpense(expense) = input.plan else {
        return Err(ProjectionError::invalid(
            "plan",
            "retirement planning needs a current monthly expense",
        ));
    };
    let Some(ages) = input.ages else {
        return Err(ProjectionError::invalid(
            "horizonStartAge",
            "retirement planning needs current and retirement ages",
        ));
    };
    assumptions.validate()?;
    // The input carries the rates it was built with; they must be the ones
    // the assumptions describe.
    if input.annual_inflation_rate != assumptions.inflation_rate {
        return Err(ProjectionError::invalid(
            "annualInflationRate",
            "must equal the retirement inflation assumption",
        ));
    }
    if input.annual_return_rate != assumptions.pre_retirement_return {
        return Err(ProjectionError::invalid(
            "annualReturnRate",
            "must equal the pre-retirement return assumption",
        ));
    }
    let expense = validate::amount("currentMonthlyExpense", expense)?;
    let years_to_retirement = input.validated_horizon()?;
    let years_in_retirement = validate::age_order(
        "lifeExpectancy",
        ages.end,
        assumptions.life_expectancy,
        "life expectancy must be greater than retirement age",
    )?;

    let pre_return = percent(assumptions.pre_retirement_return);
    let future_monthly_expense = inflation_adjusted_target(
        expense,
        percent(assumptions.inflation_rate),
        years_to_retirement,
    )?;
    let corpus_required = present_value_of_annuity(
        future_monthly_expense,
        monthly_rate(percent(assumptions.post_retirement_return)),
        months_in(years_in_retirement),
    )?;

    // Current savings keep growing until retirement and fund part of the corpus.
    let savings_at_retirement = future_value_of_lump_sum(
        input.principal,
        pre_return,
        years_to_retirement,
        Compounding::Monthly,
    )?;
    let shortfall = (corpus_required - savings_at_retirement).max(0.0);

    let months = months_in(years_to_retirement);
    let monthly_sip = required_annuity_contribution(shortfall, monthly_rate(pre_return), months)?;
    let total_contributed = validate::finite(
        "total contributed",
        input.principal + monthly_sip * f64::from(months),
    )?;

    let projection = ProjectionResult::new(corpus_required, monthly_sip, total_contributed)?;
    Ok(RetirementPlan {
        years_to_retirement,
        years_in_retirement,
        future_monthly_expense,
        corpus_required,
        savings_at_retirement,
        monthly_sip,
        projection,
    })
}

pub fn plan_goal(input: &ProjectionInput) -> Result<GoalPlan, ProjectionError> {
    let Plan::TargetAmount(target) = input.plan else {
        return Err(ProjectionError::invalid(
            "plan",
            "goal planning needs a target amount",
        ));
    };
    let target = validate::amount("targetAmount", target)?;
    let years = input.validated_horizon()?;
    let current = input.principal;

    let inflated_target =
        inflation_adjusted_target(target, percent(input.annual_inflation_rate), years)?;
    // Goal already met: nothing left to fund.
    let shortfall = (inflated_target - current).max(0.0);
    let goal_met = shortfall == 0.0;

    let months = months_in(years);
    let monthly_sip = required_annuity_contribution(
        shortfall,
        monthly_rate(percent(input.annual_return_rate)),
        months,
    )?;

    let progress_percent = if inflated_target > 0.0 {
        (current / inflated_target * 100.0).min(100.0)
    } else {
        100.0
    };
    let total_contributed =
        validate::finite("total contributed", current + monthly_sip * f64::from(months))?;

    let projection = ProjectionResult::new(inflated_target, monthly_sip, total_contributed)?;
    Ok(GoalPlan {
        inflation_adjusted_target: inflated_target,
        monthly_sip,
        goal_met,
        progress_percent,
        projection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::AgeSpan;
    use proptest::prelude::{prop_assert, proptest};

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn invalid_field(err: ProjectionError) -> &'static str {
        match err {
            ProjectionError::InvalidDomainInput { field, .. } => field,
            other => panic!("expected InvalidDomainInput, got {other:?}"),
        }
    }

    #[test]
    fn sip_reference_scenario() {
        let sip = project_sip(&ProjectionInput::sip(5_000.0, 12.0, 10)).expect("valid");
        assert_eq!(sip.total_investment, 600_000.0);
        assert_close(sip.total_value, 1_161_695.0, 1.0);
        assert_close(sip.estimated_returns, sip.total_value - 600_000.0, 1e-9);
        assert_eq!(sip.inflation_adjusted_value, sip.total_value);

        let rounded = sip.rounded();
        assert_eq!(rounded.total_value, 1_161_695.0);
        assert_eq!(rounded.estimated_returns, 561_695.0);
    }

    #[test]
    fn sip_with_zero_return_is_linear() {
        let sip = project_sip(&ProjectionInput::sip(1_000.0, 0.0, 5)).expect("valid");
        assert_eq!(sip.total_value, 60_000.0);
        assert_eq!(sip.estimated_returns, 0.0);
        assert_eq!(sip.projection.total_growth, 0.0);
    }

    #[test]
    fn sip_adds_compounded_principal_and_reports_real_value() {
        let input = ProjectionInput::sip(1_000.0, 12.0, 1)
            .with_principal(10_000.0)
            .with_inflation(6.0);
        let sip = project_sip(&input).expect("valid");
        let contributions = future_value_of_annuity(1_000.0, 0.01, 12).expect("valid");
        assert_close(
            sip.total_value,
            contributions + 10_000.0 * 1.01_f64.powi(12),
            1e-6,
        );
        assert_eq!(sip.total_investment, 22_000.0);
        assert_close(sip.inflation_adjusted_value, sip.total_value / 1.06, 1e-6);
    }

    #[test]
    fn sip_rejects_non_positive_horizon() {
        for years in [0, -3] {
            let err = project_sip(&ProjectionInput::sip(5_000.0, 12.0, years))
                .expect_err("must reject");
            assert_eq!(invalid_field(err), "horizonYears");
        }
    }

    #[test]
    fn sip_rejects_negative_contribution() {
        let err = project_sip(&ProjectionInput::sip(-5.0, 12.0, 10)).expect_err("must reject");
        assert_eq!(invalid_field(err), "monthlyContribution");
    }

    #[test]
    fn retirement_reference_scenario() {
        let assumptions = RetirementAssumptions::default();
        let input = ProjectionInput::retirement(30, 60, 50_000.0, &assumptions);
        let plan = plan_retirement(&input, &assumptions).expect("valid");

        assert_eq!(plan.years_to_retirement, 30);
        assert_eq!(plan.years_in_retirement, 25);
        assert!(plan.corpus_required > 0.0);
        assert!(plan.monthly_sip > 0.0);
        assert!(plan.monthly_sip * 12.0 * 30.0 < plan.corpus_required);
        assert_close(plan.future_monthly_expense, 287_174.56, 0.01);
        assert_close(plan.corpus_required, 37_207_634.6, 1.0);
        assert_close(plan.monthly_sip, 10_540.66, 0.01);
        assert_eq!(plan.projection.future_value, plan.corpus_required);
        assert_eq!(plan.projection.required_monthly_contribution, plan.monthly_sip);
    }

    #[test]
    fn retirement_rejects_inconsistent_ages() {
        let assumptions = RetirementAssumptions::default();

        let input = ProjectionInput::retirement(60, 60, 50_000.0, &assumptions);
        let err = plan_retirement(&input, &assumptions).expect_err("same age");
        assert_eq!(invalid_field(err), "horizonEndAge");

        let input = ProjectionInput::retirement(65, 60, 50_000.0, &assumptions);
        let err = plan_retirement(&input, &assumptions).expect_err("retire before now");
        assert_eq!(invalid_field(err), "horizonEndAge");

        let input = ProjectionInput::retirement(50, 85, 50_000.0, &assumptions);
        let err = plan_retirement(&input, &assumptions).expect_err("retire at life expectancy");
        assert_eq!(invalid_field(err), "lifeExpectancy");
    }

    #[test]
    fn retirement_rejects_mismatched_horizon() {
        let assumptions = RetirementAssumptions::default();
        let mut input = ProjectionInput::retirement(30, 60, 50_000.0, &assumptions);
        input.horizon_years = 20;
        let err = plan_retirement(&input, &assumptions).expect_err("mismatch");
        assert_eq!(invalid_field(err), "horizonYears");

        input.ages = Some(AgeSpan { start: 30, end: 50 });
        assert!(plan_retirement(&input, &assumptions).is_ok());
    }

    #[test]
    fn retirement_with_zero_rates_is_self_funded() {
        let assumptions = RetirementAssumptions {
            inflation_rate: 0.0,
            pre_retirement_return: 0.0,
            post_retirement_return: 0.0,
            life_expectancy: 70,
        };
        let input = ProjectionInput::retirement(40, 60, 1_000.0, &assumptions);
        let plan = plan_retirement(&input, &assumptions).expect("valid");
        assert_eq!(plan.corpus_required, 120_000.0);
        assert_eq!(plan.monthly_sip, 500.0);
        assert_eq!(plan.projection.total_growth, 0.0);
    }

    #[test]
    fn retirement_uses_the_assumptions_it_is_given() {
        let defaults = RetirementAssumptions::default();
        let flat = RetirementAssumptions {
            inflation_rate: 0.0,
            pre_retirement_return: 0.0,
            ..defaults
        };

        let built_with_defaults = ProjectionInput::retirement(30, 60, 50_000.0, &defaults);
        let err = plan_retirement(&built_with_defaults, &flat).expect_err("rates disagree");
        assert_eq!(invalid_field(err), "annualInflationRate");

        let mut mixed = ProjectionInput::retirement(30, 60, 50_000.0, &flat);
        mixed.annual_return_rate = 12.0;
        let err = plan_retirement(&mixed, &flat).expect_err("return disagrees");
        assert_eq!(invalid_field(err), "annualReturnRate");

        let input = ProjectionInput::retirement(30, 60, 50_000.0, &flat);
        let plan = plan_retirement(&input, &flat).expect("valid");
        assert_eq!(plan.future_monthly_expense, 50_000.0);
        assert_close(plan.monthly_sip, plan.corpus_required / 360.0, 1e-6);

        let report = project(&built_with_defaults, &flat);
        assert!(report.is_err());
    }

    #[test]
    fn retirement_savings_reduce_the_required_sip() {
        let assumptions = RetirementAssumptions::default();
        let input = ProjectionInput::retirement(30, 60, 50_000.0, &assumptions);
        let without = plan_retirement(&input, &assumptions).expect("valid");
        assert_eq!(without.savings_at_retirement, 0.0);

        let with = plan_retirement(&input.clone().with_principal(1_000_000.0), &assumptions)
            .expect("valid");
        let grown = 1_000_000.0 * 1.01_f64.powi(360);
        assert_close(with.savings_at_retirement, grown, 1e-3);
        assert_eq!(with.corpus_required, without.corpus_required);
        assert!(with.monthly_sip < without.monthly_sip);
        let expected = required_annuity_contribution(without.corpus_required - grown, 0.01, 360)
            .expect("valid");
        assert_close(with.monthly_sip, expected, 1e-6);
        assert_close(
            with.projection.total_contributed,
            1_000_000.0 + with.monthly_sip * 360.0,
            1e-6,
        );

        let funded = plan_retirement(&input.with_principal(1e9), &assumptions).expect("valid");
        assert_eq!(funded.monthly_sip, 0.0);
    }

    #[test]
    fn retirement_accepts_zero_expense() {
        let assumptions = RetirementAssumptions::default();
        let input = ProjectionInput::retirement(30, 60, 0.0, &assumptions);
        let plan = plan_retirement(&input, &assumptions).expect("zero expense is valid");
        assert_eq!(plan.corpus_required, 0.0);
        assert_eq!(plan.monthly_sip, 0.0);

        let input = ProjectionInput::retirement(30, 60, -1.0, &assumptions);
        let err = plan_retirement(&input, &assumptions).expect_err("negative expense");
        assert_eq!(invalid_field(err), "currentMonthlyExpense");
    }

    #[test]
    fn sip_overflow_is_reported_not_returned() {
        let err = project_sip(&ProjectionInput::sip(1e307, 12.0, 10)).expect_err("overflow");
        assert!(err.is_overflow(), "{err:?}");

        let err = project_sip(&ProjectionInput::sip(1e300, 100.0, 100)).expect_err("overflow");
        assert!(err.is_overflow(), "{err:?}");
    }

    #[test]
    fn goal_overflow_is_reported_not_returned() {
        let input = ProjectionInput::goal(0.0, 1e307, 100, 100.0, 0.0);
        let err = plan_goal(&input).expect_err("overflow");
        assert!(err.is_overflow(), "{err:?}");
    }

    #[test]
    fn goal_rejects_non_positive_horizon() {
        for years in [0, -1] {
            let input = ProjectionInput::goal(0.0, 1_000_000.0, years, 6.0, 12.0);
            let err = plan_goal(&input).expect_err("must reject");
            assert_eq!(invalid_field(err), "horizonYears");
        }
    }

    #[test]
    fn goal_already_met_needs_no_contribution() {
        let input = ProjectionInput::goal(5_000_000.0, 1_000_000.0, 10, 6.0, 12.0);
        let goal = plan_goal(&input).expect("valid");
        assert!(goal.goal_met);
        assert_eq!(goal.monthly_sip, 0.0);
        assert_eq!(goal.progress_percent, 100.0);
        assert_eq!(goal.projection.total_growth, 0.0);
    }

    #[test]
    fn goal_inflates_target_before_solving() {
        let input = ProjectionInput::goal(0.0, 1_000_000.0, 10, 6.0, 12.0);
        let goal = plan_goal(&input).expect("valid");
        assert_close(
            goal.inflation_adjusted_target,
            1_000_000.0 * 1.06_f64.powi(10),
            1e-6,
        );
        let reached = future_value_of_annuity(goal.monthly_sip, 0.01, 120).expect("valid");
        assert_close(reached, goal.inflation_adjusted_target, 1e-3);
        assert!(!goal.goal_met);
        assert_eq!(goal.progress_percent, 0.0);
    }

    #[test]
    fn goal_counts_current_savings_toward_progress() {
        let input = ProjectionInput::goal(250_000.0, 1_000_000.0, 5, 0.0, 0.0);
        let goal = plan_goal(&input).expect("valid");
        assert_eq!(goal.progress_percent, 25.0);
        assert_eq!(goal.monthly_sip, 12_500.0);
        assert_eq!(goal.projection.total_contributed, 1_000_000.0);
    }

    #[test]
    fn project_dispatches_on_plan() {
        let assumptions = RetirementAssumptions::default();
        let report = project(&ProjectionInput::sip(5_000.0, 12.0, 10), &assumptions)
            .expect("valid");
        assert!(matches!(report, ScenarioReport::Sip(_)));
        assert_eq!(report.projection().total_contributed, 600_000.0);

        let report = project(
            &ProjectionInput::retirement(30, 60, 50_000.0, &assumptions),
            &assumptions,
        )
        .expect("valid");
        assert!(matches!(report, ScenarioReport::Retirement(_)));

        let report = project(
            &ProjectionInput::goal(0.0, 100.0, 1, 0.0, 0.0),
            &assumptions,
        )
        .expect("valid");
        assert!(matches!(report, ScenarioReport::Goal(_)));
    }

    #[test]
    fn adapters_reject_mismatched_plans() {
        let input = ProjectionInput::goal(0.0, 100.0, 1, 0.0, 0.0);
        assert_eq!(invalid_field(project_sip(&input).expect_err("wrong plan")), "plan");
        let input = ProjectionInput::sip(100.0, 0.0, 1);
        assert_eq!(invalid_field(plan_goal(&input).expect_err("wrong plan")), "plan");
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_sip_value_increases_with_return(
            monthly in 500u32..100_000,
            years in 1i64..31,
            rate_bp in 100u32..2_900,
            bump_bp in 1u32..100
        ) {
            let low = project_sip(&ProjectionInput::sip(monthly as f64, rate_bp as f64 / 100.0, years))
                .expect("valid");
            let high = project_sip(&ProjectionInput::sip(
                monthly as f64,
                (rate_bp + bump_bp) as f64 / 100.0,
                years,
            ))
            .expect("valid");
            prop_assert!(high.total_value > low.total_value);
            prop_assert!(low.total_value >= low.total_investment);
        }

        #[test]
        fn prop_goal_sip_is_never_negative(
            current in 0u32..20_000_000,
            target in 0u32..20_000_000,
            years in 1i64..40,
            inflation_bp in 0u32..1_200,
            return_bp in 0u32..2_000
        ) {
            let input = ProjectionInput::goal(
                current as f64,
                target as f64,
                years,
                inflation_bp as f64 / 100.0,
                return_bp as f64 / 100.0,
            );
            let goal = plan_goal(&input).expect("valid");
            prop_assert!(goal.monthly_sip >= 0.0 && goal.monthly_sip.is_finite());
            prop_assert!((0.0..=100.0).contains(&goal.progress_percent));
        }

        #[test]
        fn prop_retirement_outputs_are_finite_and_positive(
            current_age in 18u32..60,
            gap in 1u32..25,
            expense in 1_000u32..500_000
        ) {
            let assumptions = RetirementAssumptions::default();
            let retirement_age = current_age + gap;
            let input = ProjectionInput::retirement(current_age, retirement_age, expense as f64, &assumptions);
            let plan = plan_retirement(&input, &assumptions).expect("valid");
            prop_assert!(plan.corpus_required.is_finite() && plan.corpus_required > 0.0);
            prop_assert!(plan.monthly_sip.is_finite() && plan.monthly_sip > 0.0);
        }
    }
}
