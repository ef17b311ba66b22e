// crates/cf_physics/src/state.rs

//! 流动状态
//!
//! [`FlowState`] 独占速度场、面通量和体积力。流向与流向投影张量
//! 在构造时由目标体积平均速度导出，此后不再改变。

use crate::fields::{FaceFlux, VolField};
use cf_foundation::tensor::outer;
use cf_foundation::{CfError, CfResult};
use cf_mesh::MeshAccess;
use glam::{DMat3, DVec3};

/// 流动状态
#[derive(Debug, Clone)]
pub struct FlowState {
    /// 速度场 U
    pub velocity: VolField<DVec3>,
    /// 面通量 phi
    pub flux: FaceFlux,
    /// 体积力（压力梯度）gradP
    pub body_force: DVec3,
    target_bulk: DVec3,
    flow_direction: DVec3,
    flow_mask: DMat3,
}

impl FlowState {
    /// 以均匀初始速度创建
    ///
    /// 壁面速度固定为零。
    pub fn new<M: MeshAccess + ?Sized>(
        mesh: &M,
        target_bulk: DVec3,
        initial_velocity: DVec3,
        body_force: DVec3,
    ) -> CfResult<Self> {
        let velocity = VolField::uniform("U", mesh, initial_velocity);
        Self::from_velocity(mesh, velocity, target_bulk, body_force)
    }

    /// 以给定速度场创建
    pub fn from_velocity<M: MeshAccess + ?Sized>(
        mesh: &M,
        mut velocity: VolField<DVec3>,
        target_bulk: DVec3,
        body_force: DVec3,
    ) -> CfResult<Self> {
        let magnitude = target_bulk.length();
        if !magnitude.is_finite() || magnitude == 0.0 {
            return Err(CfError::invalid_config(
                "transport.ubar",
                format!("{:?}", target_bulk.to_array()),
                "模必须为有限正数",
            ));
        }
        if velocity.n_cells() != mesh.n_cells() {
            return Err(CfError::size_mismatch("U", mesh.n_cells(), velocity.n_cells()));
        }
        let flow_direction = target_bulk / magnitude;

        for (pi, patch) in mesh.patches().iter().enumerate() {
            if patch.is_wall() {
                velocity.fix_patch(pi, DVec3::ZERO);
            }
        }
        velocity.correct_boundary_conditions(mesh);
        let flux = FaceFlux::from_velocity(mesh, &velocity);

        Ok(Self {
            velocity,
            flux,
            body_force,
            target_bulk,
            flow_direction,
            flow_mask: outer(flow_direction, flow_direction),
        })
    }

    /// 目标体积平均速度 Ubar
    #[inline]
    pub fn target_bulk(&self) -> DVec3 {
        self.target_bulk
    }

    /// 单位流向
    #[inline]
    pub fn flow_direction(&self) -> DVec3 {
        self.flow_direction
    }

    /// 流向投影张量 `f ⊗ f`
    #[inline]
    pub fn flow_mask(&self) -> DMat3 {
        self.flow_mask
    }

    /// 体积平均速度（未投影）
    pub fn bulk_velocity<M: MeshAccess + ?Sized>(&self, mesh: &M) -> DVec3 {
        self.velocity.weighted_average(mesh.cell_volumes())
    }

    /// 体积平均速度的流向分量（投影后的矢量）
    pub fn masked_bulk_velocity<M: MeshAccess + ?Sized>(&self, mesh: &M) -> DVec3 {
        self.flow_mask * self.bulk_velocity(mesh)
    }

    /// 修正边界并重算面通量
    pub fn update_flux<M: MeshAccess + ?Sized>(&mut self, mesh: &M) {
        self.velocity.correct_boundary_conditions(mesh);
        self.flux = FaceFlux::from_velocity(mesh, &self.velocity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_mesh::ChannelMeshBuilder;

    #[test]
    fn test_direction_and_mask_from_target() {
        let mesh = ChannelMeshBuilder::new().cells(4).build().unwrap();
        let state = FlowState::new(&mesh, DVec3::new(3.0, 4.0, 0.0), DVec3::ZERO, DVec3::ZERO).unwrap();
        assert!((state.flow_direction() - DVec3::new(0.6, 0.8, 0.0)).length() < 1e-14);
        let projected = state.flow_mask() * DVec3::new(1.0, 0.0, 7.0);
        assert!((projected - DVec3::new(0.36, 0.48, 0.0)).length() < 1e-14);
    }

    #[test]
    fn test_zero_target_rejected() {
        let mesh = ChannelMeshBuilder::new().cells(4).build().unwrap();
        assert!(FlowState::new(&mesh, DVec3::ZERO, DVec3::ZERO, DVec3::ZERO).is_err());
    }

    #[test]
    fn test_walls_fixed_at_zero() {
        let mesh = ChannelMeshBuilder::new().cells(4).build().unwrap();
        let state = FlowState::new(&mesh, DVec3::X, DVec3::X, DVec3::ZERO).unwrap();
        assert_eq!(state.velocity.boundary_value(0, 0), DVec3::ZERO);
        assert_eq!(state.velocity.boundary_value(1, 0), DVec3::ZERO);
        assert_eq!(state.velocity.boundary_value(2, 0), DVec3::X);
        assert!((state.bulk_velocity(&mesh) - DVec3::X).length() < 1e-14);
    }
}
