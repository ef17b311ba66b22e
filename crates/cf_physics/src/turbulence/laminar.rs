// crates/cf_physics/src/turbulence/laminar.rs

//! 层流模型：ν_t = k = ε = 0

use super::traits::{TurbulenceContext, TurbulenceFields, TurbulenceModel};
use crate::fields::VolField;
use cf_foundation::{CfResult, SymmTensor};
use cf_mesh::MeshAccess;

/// 层流
#[derive(Debug, Clone)]
pub struct Laminar {
    fields: TurbulenceFields,
}

impl Laminar {
    /// 以运动粘度 ν 创建
    pub fn new<M: MeshAccess + ?Sized>(mesh: &M, nu: f64) -> Self {
        Self {
            fields: TurbulenceFields::new(mesh, nu),
        }
    }
}

impl TurbulenceModel for Laminar {
    fn name(&self) -> &'static str {
        "laminar"
    }

    fn correct(&mut self, ctx: &TurbulenceContext<'_>) -> CfResult<()> {
        self.fields.update_stresses(ctx.grad_u);
        Ok(())
    }

    fn nu(&self) -> &VolField<f64> {
        &self.fields.nu
    }

    fn nut(&self) -> &VolField<f64> {
        &self.fields.nut
    }

    fn k(&self) -> &VolField<f64> {
        &self.fields.k
    }

    fn epsilon(&self) -> &VolField<f64> {
        &self.fields.epsilon
    }

    fn r(&self) -> &VolField<SymmTensor> {
        &self.fields.r
    }

    fn dev_reff(&self) -> &VolField<SymmTensor> {
        &self.fields.dev_reff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FaceFlux;
    use crate::numerics::grad_vector;
    use cf_mesh::ChannelMeshBuilder;
    use glam::DVec3;

    #[test]
    fn test_laminar_wall_stress_is_viscous() {
        let mesh = ChannelMeshBuilder::new().cells(4).height(2.0).build().unwrap();
        let mut u = VolField::uniform("U", &mesh, DVec3::X);
        u.fix_patch(0, DVec3::ZERO);
        u.fix_patch(1, DVec3::ZERO);
        u.correct_boundary_conditions(&mesh);
        let grad = grad_vector(&mesh, &u);
        let flux = FaceFlux::from_velocity(&mesh, &u);
        let distance = cf_mesh::wall_distance(&mesh);

        let mut model = Laminar::new(&mesh, 0.01);
        model
            .correct(&TurbulenceContext {
                mesh: &mesh,
                velocity: &u,
                flux: &flux,
                grad_u: &grad,
                wall_distance: &distance,
            })
            .unwrap();

        // 底壁 du/dy = 4
        let wall = model.dev_reff().boundary_value(0, 0);
        assert!((wall.xy + 0.04).abs() < 1e-12);
        assert!(model.nut().internal().iter().all(|&v| v == 0.0));
        assert!(model.k().internal().iter().all(|&v| v == 0.0));
        assert_eq!(model.nu_eff().internal()[0], 0.01);
    }
}
