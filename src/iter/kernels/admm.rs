//! Scaled-form ADMM with over-relaxation, penalty adaptation and an
//! accelerated variant.
//!
//! Purpose
//! -------
//! Minimize `½ xᴴAx − Re(bᴴx) + Σᵢ gᵢ(Gᵢx)` over the image `x`, splitting each
//! regularization term through its own variable `zᵢ = Gᵢx` with scaled dual
//! `uᵢ`. One iteration is
//!
//! 1. x-update: solve `(A + ρ ΣGᵢᴴGᵢ) x = b + ρ ΣGᵢᴴ(zᵢ − uᵢ)` with at most
//!    `maxitercg` inner CG iterations, or call the x-update operator with
//!    `ρ` and `ΣGᵢᴴ(zᵢ − uᵢ)` when one is supplied.
//! 2. relaxation: `x̂ᵢ = α Gᵢx + (1 − α) zᵢ`.
//! 3. z-update: `zᵢ = proxᵢ(1/ρ)(x̂ᵢ + uᵢ)`.
//! 4. dual update: `uᵢ = uᵢ + x̂ᵢ − zᵢ`.
//!
//! Key behaviors
//! -------------
//! - Stops when the primal residual `r = ‖(Gᵢx − zᵢ)ᵢ‖` and the dual residual
//!   `s = ρ‖ΣGᵢᴴ(zᵢ − zᵢ_prev)‖` are both strictly below their thresholds
//!   (`abstol`, `reltol` in the usual absolute/relative combination).
//! - With no transforms both residuals vanish; the run then stops as soon as
//!   an x-update moves `x` by no more than the dual threshold.
//! - `dynamic_rho`: residual balancing, multiplying or dividing `ρ` by `tau`
//!   whenever one residual exceeds `mu` times the other.
//! - `hogwild`: doubles `ρ` on the [`Hogwild`] schedule.
//! - `fast`: Nesterov-type extrapolation of `(z, u)` with restart whenever
//!   the combined residual fails to decrease.
//! - Every change of `ρ` rescales the dual variables so `ρ·u` is preserved.
//!
//! Invariants & assumptions
//! ------------------------
//! - `A` and `b` may be absent; missing terms drop out of the x-update.
//! - The x iterate always starts from the image buffer. With `do_warmstart`
//!   the split variables start at `zᵢ = Gᵢx`, otherwise at zero; the duals
//!   always start at zero.
use log::debug;

use crate::{
    iter::{
        admm_plan::AdmmPlan,
        errors::IterResult,
        kernels::{
            conjgrad::cg_solve,
            ist::Hogwild,
            vecops::{axpy, dist, norm, scale, sub},
        },
        monitor::IterMonitor,
        types::IterReport,
    },
    linops::{adapters::LinopIter, traits::Operator},
};

/// Per-iteration trajectories recorded by [`admm`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdmmHistory {
    pub numiter: usize,
    pub r_norm: Vec<f64>,
    pub s_norm: Vec<f64>,
    pub eps_pri: Vec<f64>,
    pub eps_dual: Vec<f64>,
    /// Penalty in effect during each iteration.
    pub rho: Vec<f64>,
}

impl AdmmHistory {
    fn push(&mut self, r_norm: f64, s_norm: f64, eps_pri: f64, eps_dual: f64, rho: f64) {
        self.numiter += 1;
        self.r_norm.push(r_norm);
        self.s_norm.push(s_norm);
        self.eps_pri.push(eps_pri);
        self.eps_dual.push(eps_dual);
        self.rho.push(rho);
    }
}

/// `Σᵢ Gᵢᴴ vᵢ` into `dst`.
fn sum_adjoint(ops: &[LinopIter<'_>], dst: &mut [f64], v: &[Vec<f64>]) {
    dst.fill(0.0);
    let mut tmp = vec![0.0; dst.len()];
    for (g, vi) in ops.iter().zip(v) {
        g.adjoint(&mut tmp, vi);
        axpy(dst, 1.0, &tmp);
    }
}

/// `√(Σᵢ ‖vᵢ‖²)`
fn stacked_norm(v: &[Vec<f64>]) -> f64 {
    v.iter().map(|vi| norm(vi).powi(2)).sum::<f64>().sqrt()
}

fn scale_all(v: &mut [Vec<f64>], a: f64) {
    v.iter_mut().for_each(|vi| scale(vi, a));
}

/// `√(Σᵢ ‖aᵢ − bᵢ‖²)`
fn stacked_dist(a: &[Vec<f64>], b: &[Vec<f64>]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(ai, bi)| ai.iter().zip(bi).map(|(x, y)| (x - y) * (x - y)).sum::<f64>())
        .sum::<f64>()
        .sqrt()
}

/// Run ADMM on `plan`, updating `x` in place.
///
/// # Errors
/// Backend failures of the inner conjugate-gradient solve.
pub fn admm(
    plan: &mut AdmmPlan<'_>, op: Option<&dyn Operator>, x: &mut [f64], b: Option<&[f64]>,
    monitor: &IterMonitor<'_>,
) -> IterResult<(IterReport, AdmmHistory)> {
    let n = x.len();
    if let Some(b) = b {
        assert_eq!(b.len(), n, "image and right-hand side differ in length");
    }
    for g in &plan.ops {
        assert_eq!(g.domain_len(), n, "transform domain does not match image length");
    }
    let z_dims = plan.z_dims();
    let num_funs = plan.num_funs();
    let p_total: usize = z_dims.iter().sum();

    let mut z: Vec<Vec<f64>> = z_dims.iter().map(|&len| vec![0.0; len]).collect();
    let mut u = z.clone();
    let mut gx = z.clone();
    if plan.do_warmstart {
        for (g, zi) in plan.ops.iter().zip(z.iter_mut()) {
            g.forward(zi, x);
        }
    }

    // Extrapolated split/dual variables used by the fast variant.
    let mut z_hat = z.clone();
    let mut u_hat = u.clone();
    let mut z_prev = z.clone();
    let mut u_prev = u.clone();
    let mut ra = 1.0_f64;
    let mut c_prev = f64::INFINITY;

    let mut rho = plan.rho;
    let mut hogwild = Hogwild::new();
    let mut history = AdmmHistory::default();
    let mut rhs = vec![0.0; n];
    let mut diff: Vec<Vec<f64>> = z.clone();
    let mut tmp_n = vec![0.0; n];
    let mut x_prev = vec![0.0; n];
    let mut report = IterReport::max_iter_reached(plan.maxiter);

    for iter in 0..plan.maxiter {
        let (zc, uc) =
            if plan.fast { (z_hat.clone(), u_hat.clone()) } else { (z.clone(), u.clone()) };

        // x-update
        x_prev.copy_from_slice(x);
        for (di, (zi, ui)) in diff.iter_mut().zip(zc.iter().zip(&uc)) {
            sub(di, zi, ui);
        }
        sum_adjoint(&plan.ops, &mut rhs, &diff);
        if let Some(xupdate) = plan.xupdate {
            xupdate.apply(rho, x, &rhs);
        } else if op.is_some() || num_funs > 0 {
            scale(&mut rhs, rho);
            if let Some(b) = b {
                axpy(&mut rhs, 1.0, b);
            }
            let ops = &plan.ops;
            let normal = |dst: &mut [f64], src: &[f64]| {
                match op {
                    Some(a) => a.apply(dst, src),
                    None => dst.fill(0.0),
                }
                let mut tmp = vec![0.0; src.len()];
                for g in ops {
                    g.normal(&mut tmp, src);
                    axpy(dst, rho, &tmp);
                }
            };
            cg_solve(plan.maxitercg, 0.0, 0.0, &normal, x, &rhs)?;
        }

        // relaxation, z-update, dual update
        for i in 0..num_funs {
            plan.ops[i].forward(&mut gx[i], x);
            let xhat: Vec<f64> = gx[i]
                .iter()
                .zip(&zc[i])
                .map(|(&g, &zv)| plan.alpha * g + (1.0 - plan.alpha) * zv)
                .collect();
            let arg: Vec<f64> = xhat.iter().zip(&uc[i]).map(|(a, b)| a + b).collect();
            plan.prox_ops[i].apply(1.0 / rho, &mut z[i], &arg);
            for ((uv, (&ucv, &xh)), &zv) in
                u[i].iter_mut().zip(uc[i].iter().zip(&xhat)).zip(&z[i])
            {
                *uv = ucv + xh - zv;
            }
        }

        // residuals
        let r_norm = stacked_dist(&gx, &z);
        for (di, (zi, zo)) in diff.iter_mut().zip(z.iter().zip(&zc)) {
            sub(di, zi, zo);
        }
        sum_adjoint(&plan.ops, &mut tmp_n, &diff);
        let s_norm = rho * norm(&tmp_n);

        sum_adjoint(&plan.ops, &mut tmp_n, &u);
        let eps_pri = (p_total as f64).sqrt() * plan.abstol
            + plan.reltol * stacked_norm(&gx).max(stacked_norm(&z));
        let eps_dual = (n as f64).sqrt() * plan.abstol + plan.reltol * rho * norm(&tmp_n);

        history.push(r_norm, s_norm, eps_pri, eps_dual, rho);
        monitor.report(iter, x, r_norm);
        debug!(
            "admm #It {iter:03}: r = {r_norm:e} (eps_pri {eps_pri:e}), \
             s = {s_norm:e} (eps_dual {eps_dual:e}), rho = {rho}"
        );

        if r_norm < eps_pri && s_norm < eps_dual {
            report = IterReport::converged(iter + 1);
            break;
        }
        // Without split variables the x-update is the whole problem; stop
        // once it leaves x in place.
        if num_funs == 0 && dist(x, &x_prev) <= eps_dual + plan.reltol * norm(x) {
            report = IterReport::converged(iter + 1);
            break;
        }

        // acceleration with restart
        if plan.fast {
            let c = rho * (stacked_dist(&u, &uc).powi(2) + stacked_dist(&z, &zc).powi(2));
            if c < 0.999 * c_prev {
                let ra_new = (1.0 + (1.0 + 4.0 * ra * ra).sqrt()) / 2.0;
                let beta = (ra - 1.0) / ra_new;
                for i in 0..num_funs {
                    extrapolate(&mut z_hat[i], &z[i], &z_prev[i], beta);
                    extrapolate(&mut u_hat[i], &u[i], &u_prev[i], beta);
                }
                ra = ra_new;
                c_prev = c;
            } else {
                debug!("admm: restarting momentum");
                z_hat.clone_from(&z);
                u_hat.clone_from(&u);
                ra = 1.0;
                c_prev /= 0.999;
            }
            z_prev.clone_from(&z);
            u_prev.clone_from(&u);
        }

        // penalty adaptation
        let mut factor = 1.0;
        if plan.dynamic_rho {
            if r_norm > plan.mu * s_norm {
                factor *= plan.tau;
            } else if s_norm > plan.mu * r_norm {
                factor /= plan.tau;
            }
        }
        if plan.hogwild && hogwild.tick() {
            factor *= 2.0;
        }
        if factor != 1.0 {
            rho *= factor;
            scale_all(&mut u, 1.0 / factor);
            scale_all(&mut u_hat, 1.0 / factor);
            scale_all(&mut u_prev, 1.0 / factor);
            debug!("admm: rho changed to {rho}");
        }
    }

    plan.rho = rho;
    debug!("admm finished after {} iterations: {:?}", history.numiter, report.status);
    Ok((report, history))
}

/// `dst = cur + beta · (cur − prev)`
fn extrapolate(dst: &mut [f64], cur: &[f64], prev: &[f64], beta: f64) {
    for ((d, &c), &p) in dst.iter_mut().zip(cur).zip(prev) {
        *d = c + beta * (c - p);
    }
}
